use std::future::Future;

use evrange_core::{require_api_key, AppConfig, Backend, Coordinate};

use crate::error::OracleError;
use crate::google::GoogleClient;
use crate::ors::OrsClient;
use crate::types::Route;

/// Answers "how far is it to drive from `from` to `to`".
///
/// Implementations make at most one upstream round trip per call and never
/// retry; retry policy belongs to the caller.
pub trait DistanceOracle: Send + Sync {
    fn driving_distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<Route, OracleError>> + Send;

    /// Short backend name for logs and diagnostics.
    fn backend_name(&self) -> &'static str;
}

impl DistanceOracle for OrsClient {
    async fn driving_distance(&self, from: Coordinate, to: Coordinate) -> Result<Route, OracleError> {
        self.route(from, to).await
    }

    fn backend_name(&self) -> &'static str {
        "openrouteservice"
    }
}

impl DistanceOracle for GoogleClient {
    async fn driving_distance(&self, from: Coordinate, to: Coordinate) -> Result<Route, OracleError> {
        self.route(from, to).await
    }

    fn backend_name(&self) -> &'static str {
        "google"
    }
}

/// The routing backend chosen at startup.
pub enum OracleClient {
    OpenRouteService(OrsClient),
    Google(GoogleClient),
}

impl OracleClient {
    /// Builds the client for `backend` from process configuration.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Configuration`] if the backend's API key is missing.
    /// - [`OracleError::Http`] / [`OracleError::InvalidBaseUrl`] if the HTTP
    ///   client or a configured base URL override is invalid.
    pub fn from_config(backend: Backend, config: &AppConfig) -> Result<Self, OracleError> {
        let api_key = require_api_key(config, backend)?;
        let timeout = config.request_timeout_secs;
        let ua = config.user_agent.as_str();

        let client = match backend {
            Backend::OpenRouteService => Self::OpenRouteService(match &config.ors_base_url {
                Some(base) => OrsClient::with_base_url(api_key, timeout, ua, base)?,
                None => OrsClient::new(api_key, timeout, ua)?,
            }),
            Backend::Google => Self::Google(match &config.google_base_url {
                Some(base) => GoogleClient::with_base_url(api_key, timeout, ua, base)?,
                None => GoogleClient::new(api_key, timeout, ua)?,
            }),
        };
        tracing::debug!(backend = client.backend_name(), "distance oracle configured");
        Ok(client)
    }
}

impl DistanceOracle for OracleClient {
    async fn driving_distance(&self, from: Coordinate, to: Coordinate) -> Result<Route, OracleError> {
        match self {
            Self::OpenRouteService(c) => c.route(from, to).await,
            Self::Google(c) => c.route(from, to).await,
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            Self::OpenRouteService(c) => c.backend_name(),
            Self::Google(c) => c.backend_name(),
        }
    }
}
