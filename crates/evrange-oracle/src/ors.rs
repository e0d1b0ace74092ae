//! Client for the OpenRouteService `driving-car` directions endpoint.

use evrange_core::Coordinate;
use reqwest::{Client, StatusCode, Url};

use crate::error::OracleError;
use crate::http::{build_client, endpoint, is_transient_status, parse_json, transport_error};
use crate::types::{OrsDirectionsResponse, OrsErrorBody, OrsErrorResponse, Route};

const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";
const DIRECTIONS_PATH: &str = "v2/directions/driving-car";
const BACKEND: &str = "openrouteservice";

/// ORS error codes meaning "no drivable path": 2009 route not found,
/// 2010 point not found (nothing routable near the coordinate).
const NO_ROUTE_CODES: &[i64] = &[2009, 2010];

/// OpenRouteService directions client.
///
/// Use [`OrsClient::new`] for production or [`OrsClient::with_base_url`] to
/// point at a mock server in tests.
pub struct OrsClient {
    client: Client,
    api_key: String,
    directions_url: Url,
}

impl OrsClient {
    /// Creates a client pointed at the public OpenRouteService API.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, OracleError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (self-hosted ORS or wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`OracleError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, OracleError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            api_key: api_key.to_owned(),
            directions_url: endpoint(base_url, DIRECTIONS_PATH)?,
        })
    }

    /// Requests the driving route between `from` and `to`.
    ///
    /// # Errors
    ///
    /// - [`OracleError::InvalidCoordinate`] before any request if either point is invalid.
    /// - [`OracleError::Unavailable`] on network failure, HTTP 429, or 5xx.
    /// - [`OracleError::NoRoute`] on HTTP 404 or ORS codes 2009/2010, or an
    ///   empty feature collection.
    /// - [`OracleError::Rejected`] on any other non-2xx status.
    /// - [`OracleError::Deserialize`] if a 2xx body is not the expected GeoJSON.
    pub async fn route(&self, from: Coordinate, to: Coordinate) -> Result<Route, OracleError> {
        from.validate()?;
        to.validate()?;

        let url = self.build_url(from, to);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/geo+json, application/json")
            .send()
            .await
            .map_err(|e| transport_error(BACKEND, &e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(BACKEND, &e))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: OrsDirectionsResponse = parse_json(&body, "ORS directions response")?;
        let Some(feature) = parsed.features.into_iter().next() else {
            return Err(OracleError::NoRoute {
                backend: BACKEND,
                reason: "response contained no route features".to_owned(),
            });
        };
        let summary = feature.properties.summary;
        Ok(Route::from_meters_seconds(summary.distance, summary.duration))
    }

    /// ORS takes `lon,lat` order for `start` and `end`.
    fn build_url(&self, from: Coordinate, to: Coordinate) -> Url {
        let mut url = self.directions_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("start", &format!("{},{}", from.lon, from.lat))
            .append_pair("end", &format!("{},{}", to.lon, to.lat));
        url
    }
}

fn classify_failure(status: StatusCode, body: &str) -> OracleError {
    let (code, message) = match serde_json::from_str::<OrsErrorResponse>(body) {
        Ok(OrsErrorResponse {
            error: OrsErrorBody::Detailed { code, message },
        }) => (code, message.unwrap_or_default()),
        Ok(OrsErrorResponse {
            error: OrsErrorBody::Message(message),
        }) => (None, message),
        Err(_) => (None, body.chars().take(200).collect()),
    };

    if is_transient_status(status) {
        return OracleError::Unavailable {
            backend: BACKEND,
            reason: format!("HTTP {status}: {message}"),
        };
    }

    if status == StatusCode::NOT_FOUND || code.is_some_and(|c| NO_ROUTE_CODES.contains(&c)) {
        let reason = match code {
            Some(c) => format!("code {c}: {message}"),
            None => message,
        };
        return OracleError::NoRoute {
            backend: BACKEND,
            reason,
        };
    }

    OracleError::Rejected {
        backend: BACKEND,
        status: Some(status.as_u16()),
        message,
    }
}
