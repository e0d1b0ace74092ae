use evrange_core::{ConfigError, CoreError};
use thiserror::Error;

/// Uniform failure taxonomy for every routing backend.
#[derive(Debug, Error)]
pub enum OracleError {
    /// A coordinate failed validation; no request was sent.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoreError),

    /// Rate limit, timeout, connection failure, or 5xx. Worth retrying.
    #[error("{backend} unavailable: {reason}")]
    Unavailable {
        backend: &'static str,
        reason: String,
    },

    /// The service answered but has no road path between the points.
    #[error("{backend} found no route: {reason}")]
    NoRoute {
        backend: &'static str,
        reason: String,
    },

    /// The service refused the request (bad key, quota, malformed query).
    #[error("{backend} rejected the request{}: {message}", status_suffix(.status))]
    Rejected {
        backend: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The underlying `reqwest::Client` could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

#[allow(clippy::ref_option)]
fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl OracleError {
    /// `true` only for failures a later identical request might not hit.
    ///
    /// `NoRoute` is deliberately final: rescaling or retrying cannot create a
    /// road across open water.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, OracleError::Unavailable { .. })
    }
}
