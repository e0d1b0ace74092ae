//! Bounded retry for oracle probes that hit a rate limit or a flaky backend.
//!
//! Only [`OracleError::Unavailable`] is worth another attempt; every other
//! failure describes the candidate itself and would repeat.

use std::future::Future;
use std::time::Duration;

use evrange_oracle::OracleError;

const MAX_DELAY_MS: u64 = 30_000;

/// Sleep before retry number `retry` (1-based): `base × 2^(retry-1)`, capped at
/// 30 s, then scaled by `jitter` (expected in `[0.75, 1.25]`).
fn backoff_delay(backoff_base_ms: u64, retry: u32, jitter: f64) -> Duration {
    let doubling = 1u64 << retry.saturating_sub(1).min(10);
    let capped = backoff_base_ms.saturating_mul(doubling).min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let ms = (capped as f64 * jitter) as u64;
    Duration::from_millis(ms)
}

/// Runs `probe` once, then up to `max_retries` more times while it keeps
/// failing with a transient error.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut probe: F,
) -> Result<T, OracleError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OracleError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match probe().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && retry < max_retries => err,
            Err(err) => return Err(err),
        };
        retry += 1;
        let delay = backoff_delay(backoff_base_ms, retry, 0.75 + rand::random::<f64>() * 0.5);
        tracing::warn!(
            retry,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "oracle unavailable, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
