//! Programmatic entry point: compute a reachability result, then render it.

use std::path::Path;

use evrange_core::{
    AppConfig, Backend, Bearing, BoundaryPoint, Coordinate, RangeRequest, ReachabilityPolygon,
    SearchStatus,
};
use evrange_oracle::{DistanceOracle, MemoStats, MemoizedOracle, OracleClient, OracleError};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio::time::Instant;

use crate::error::EstimateError;
use crate::params::SearchParams;
use crate::polygon::assemble;
use crate::render::{save_map, LeafletRenderer, MapRenderer};
use crate::search::search_bearing;

/// Everything one run produced. Rebuilt from scratch on every compute call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachabilityResult {
    pub request: RangeRequest,
    pub polygon: ReachabilityPolygon,
    /// Boundary points that became polygon vertices, ascending by bearing.
    pub boundary_points: Vec<BoundaryPoint>,
    /// Bearings whose search failed, ascending.
    pub excluded_bearings: Vec<Bearing>,
    pub oracle: MemoStats,
}

impl ReachabilityResult {
    #[must_use]
    pub fn count_with_status(&self, status: SearchStatus) -> usize {
        self.boundary_points
            .iter()
            .filter(|p| p.status == status)
            .count()
    }
}

/// Estimates the area an EV can reach from a start point.
///
/// The oracle is chosen once at construction; the per-run cache is not. Each
/// [`RangeEstimator::compute`] call starts from an empty cache, so repeated
/// calls never see each other's answers.
pub struct RangeEstimator<O> {
    request: RangeRequest,
    oracle: O,
    params: SearchParams,
}

impl RangeEstimator<OracleClient> {
    /// Validates the request and connects it to the configured routing backend.
    ///
    /// # Errors
    ///
    /// - [`EstimateError::InvalidArgument`] for a malformed request, before
    ///   any client is built.
    /// - [`EstimateError::Configuration`] if the backend's API key is missing.
    /// - [`EstimateError::Oracle`] if the HTTP client cannot be built.
    pub fn from_config(
        start: Coordinate,
        battery_range_km: f64,
        buffer_km: f64,
        directions: u32,
        backend: Backend,
        config: &AppConfig,
    ) -> Result<Self, EstimateError> {
        let request = RangeRequest::new(start, battery_range_km, buffer_km, directions, backend)?;
        let oracle = OracleClient::from_config(backend, config).map_err(|e| match e {
            OracleError::Configuration(c) => EstimateError::Configuration(c),
            other => EstimateError::Oracle(other),
        })?;
        Self::new(request, oracle, SearchParams::from_config(config))
    }
}

impl<O: DistanceOracle> RangeEstimator<O> {
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidArgument`] if `params` fail validation.
    pub fn new(
        request: RangeRequest,
        oracle: O,
        params: SearchParams,
    ) -> Result<Self, EstimateError> {
        params.validate()?;
        Ok(Self {
            request,
            oracle,
            params,
        })
    }

    /// Replaces the search parameters, e.g. with command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidArgument`] if `params` fail validation.
    pub fn with_params(self, params: SearchParams) -> Result<Self, EstimateError> {
        params.validate()?;
        Ok(Self { params, ..self })
    }

    #[must_use]
    pub fn request(&self) -> &RangeRequest {
        &self.request
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Runs every bearing search, bounded by `max_concurrent_searches`, and
    /// assembles the result.
    ///
    /// Bearings still running when the deadline passes are recorded as
    /// [`SearchStatus::OracleFailed`]; the polygon is built from the rest.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InsufficientBoundaryPoints`] when fewer than
    /// three bearings produce a usable point.
    pub async fn compute(&self) -> Result<ReachabilityResult, EstimateError> {
        let memo = MemoizedOracle::new(&self.oracle);
        let start = self.request.start();
        let usable_km = self.request.usable_range_km();
        let deadline = self.params.deadline.map(|d| Instant::now() + d);

        tracing::info!(
            %start,
            usable_km,
            directions = self.request.directions(),
            backend = self.oracle.backend_name(),
            "computing reachable area"
        );

        let memo_ref = &memo;
        let params = &self.params;
        let points: Vec<BoundaryPoint> = stream::iter(self.request.bearings())
            .map(move |bearing| async move {
                let search = search_bearing(memo_ref, start, bearing, usable_km, params);
                let Some(at) = deadline else {
                    return search.await;
                };
                if Instant::now() >= at {
                    tracing::warn!(%bearing, "deadline passed before search started");
                    return BoundaryPoint::failed(bearing, start, 0);
                }
                if let Ok(point) = tokio::time::timeout_at(at, search).await {
                    point
                } else {
                    tracing::warn!(%bearing, "deadline passed, abandoning bearing");
                    BoundaryPoint::failed(bearing, start, 0)
                }
            })
            .buffer_unordered(params.max_concurrent_searches)
            .collect()
            .await;

        let stats = memo.stats();
        let assembly = match assemble(points) {
            Ok(assembly) => assembly,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    upstream_calls = stats.upstream_calls,
                    "not enough bearings resolved to build a polygon"
                );
                return Err(e);
            }
        };

        let result = ReachabilityResult {
            request: self.request.clone(),
            polygon: assembly.polygon,
            boundary_points: assembly.included,
            excluded_bearings: assembly.excluded,
            oracle: stats,
        };

        tracing::info!(
            vertices = result.polygon.vertex_count(),
            converged = result.count_with_status(SearchStatus::Converged),
            exhausted = result.count_with_status(SearchStatus::ExhaustedIterations),
            failed = result.excluded_bearings.len(),
            upstream_calls = stats.upstream_calls,
            cache_hits = stats.cache_hits,
            "reachable area computed"
        );
        Ok(result)
    }

    /// Writes `result` as an interactive HTML map to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::Render`] or [`EstimateError::Io`].
    pub fn save_map(&self, result: &ReachabilityResult, path: &Path) -> Result<(), EstimateError> {
        self.save_map_with(&LeafletRenderer::default(), result, path)
    }

    /// Same as [`RangeEstimator::save_map`] with a caller-chosen renderer.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::Render`] or [`EstimateError::Io`].
    #[allow(clippy::unused_self)]
    pub fn save_map_with(
        &self,
        renderer: &dyn MapRenderer,
        result: &ReachabilityResult,
        path: &Path,
    ) -> Result<(), EstimateError> {
        save_map(renderer, result, path)
    }
}
