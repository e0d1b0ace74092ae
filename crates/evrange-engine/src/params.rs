use std::time::Duration;

use evrange_core::{AppConfig, CoreError};

/// Tuning knobs for the boundary search.
///
/// Defaults: 5 iterations, ±5 % tolerance, guesses clamped to
/// `[0.1 km, 2 × usable range]`, 2 retries on transient oracle failures.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Oracle probes per bearing before settling for the last candidate.
    pub max_iterations: u32,
    /// Accept when `|observed − usable| ≤ tolerance_ratio × usable` ...
    pub tolerance_ratio: f64,
    /// ... or `≤ tolerance_km`, whichever is larger.
    pub tolerance_km: f64,
    /// Upper clamp on the straight-line guess, as a multiple of usable range.
    pub max_scale: f64,
    /// Lower clamp on the straight-line guess.
    pub min_distance_km: f64,
    /// Extra attempts for one probe after an `Unavailable` failure.
    pub max_oracle_retries: u32,
    /// Base delay for exponential retry back-off.
    pub retry_backoff_base_ms: u64,
    /// Bearings searched at the same time.
    pub max_concurrent_searches: usize,
    /// Wall-clock budget for a whole run; unfinished bearings count as failed.
    pub deadline: Option<Duration>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            tolerance_ratio: 0.05,
            tolerance_km: 0.0,
            max_scale: 2.0,
            min_distance_km: 0.1,
            max_oracle_retries: 2,
            retry_backoff_base_ms: 500,
            max_concurrent_searches: 4,
            deadline: None,
        }
    }
}

impl SearchParams {
    /// Defaults overlaid with the concurrency, retry, and deadline settings
    /// from process configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_oracle_retries: config.max_oracle_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
            max_concurrent_searches: config.max_concurrent_searches,
            deadline: config.deadline(),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] for a zero iteration or
    /// concurrency limit, negative or non-finite tolerances, a scale below 1,
    /// or a non-positive lower clamp.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fail = |msg: String| Err(CoreError::InvalidArgument(msg));

        if self.max_iterations == 0 {
            return fail("max_iterations must be at least 1".to_owned());
        }
        if self.max_concurrent_searches == 0 {
            return fail("max_concurrent_searches must be at least 1".to_owned());
        }
        if !self.tolerance_ratio.is_finite() || self.tolerance_ratio < 0.0 {
            return fail(format!(
                "tolerance_ratio must be non-negative, got {}",
                self.tolerance_ratio
            ));
        }
        if !self.tolerance_km.is_finite() || self.tolerance_km < 0.0 {
            return fail(format!(
                "tolerance_km must be non-negative, got {}",
                self.tolerance_km
            ));
        }
        if !self.max_scale.is_finite() || self.max_scale < 1.0 {
            return fail(format!("max_scale must be at least 1, got {}", self.max_scale));
        }
        if !self.min_distance_km.is_finite() || self.min_distance_km <= 0.0 {
            return fail(format!(
                "min_distance_km must be positive, got {}",
                self.min_distance_km
            ));
        }
        Ok(())
    }

    /// Absolute acceptance band around `usable_km`.
    #[must_use]
    pub fn tolerance_for(&self, usable_km: f64) -> f64 {
        (self.tolerance_ratio * usable_km).max(self.tolerance_km)
    }
}
