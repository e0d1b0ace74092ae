//! Per-run memoization of oracle answers.
//!
//! A [`MemoizedOracle`] lives for exactly one estimation run. It is created
//! when the run starts and dropped when it ends, so answers never leak
//! between unrelated requests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use evrange_core::Coordinate;

use crate::error::OracleError;
use crate::oracle::DistanceOracle;
use crate::types::Route;

/// Exact bit patterns of `(from.lat, from.lon, to.lat, to.lon)`.
type PairKey = [u64; 4];

fn pair_key(from: Coordinate, to: Coordinate) -> PairKey {
    [
        from.lat.to_bits(),
        from.lon.to_bits(),
        to.lat.to_bits(),
        to.lon.to_bits(),
    ]
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MemoStats {
    /// Calls forwarded to the wrapped oracle, failed ones included.
    pub upstream_calls: u64,
    pub cache_hits: u64,
}

/// Wraps an oracle with a cache of successful answers, safe to share between
/// concurrent bearing searches.
///
/// Failures are never cached: a transient error must be retryable and a
/// `NoRoute` answer ends that bearing's search anyway.
pub struct MemoizedOracle<'a, O> {
    inner: &'a O,
    cache: Mutex<HashMap<PairKey, Route>>,
    upstream_calls: AtomicU64,
    cache_hits: AtomicU64,
}

impl<'a, O: DistanceOracle> MemoizedOracle<'a, O> {
    pub fn new(inner: &'a O) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
            upstream_calls: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            upstream_calls: self.upstream_calls.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
        }
    }

    fn cached(&self, key: &PairKey) -> Option<Route> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    fn store(&self, key: PairKey, route: Route) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, route);
    }
}

impl<O: DistanceOracle> DistanceOracle for MemoizedOracle<'_, O> {
    async fn driving_distance(&self, from: Coordinate, to: Coordinate) -> Result<Route, OracleError> {
        let key = pair_key(from, to);
        if let Some(route) = self.cached(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(%from, %to, "oracle cache hit");
            return Ok(route);
        }

        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
        let route = self.inner.driving_distance(from, to).await?;
        self.store(key, route);
        Ok(route)
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}
