use std::path::PathBuf;

use evrange_core::{Bearing, ConfigError, CoreError};
use evrange_oracle::OracleError;
use thiserror::Error;

/// Errors that abort an estimation run.
///
/// Per-bearing oracle failures are not represented here: they downgrade that
/// bearing and only surface as [`EstimateError::InsufficientBoundaryPoints`]
/// when too few bearings survive.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error(transparent)]
    InvalidArgument(#[from] CoreError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The oracle client itself could not be built.
    #[error("distance oracle setup failed: {0}")]
    Oracle(#[from] OracleError),

    #[error(
        "insufficient boundary points: {resolved} resolved, {} bearings failed",
        .failed_bearings.len()
    )]
    InsufficientBoundaryPoints {
        resolved: usize,
        failed_bearings: Vec<Bearing>,
    },

    #[error("map rendering failed: {0}")]
    Render(String),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
