//! Client for the Google Maps Directions API.

use evrange_core::Coordinate;
use reqwest::{Client, Url};

use crate::error::OracleError;
use crate::http::{build_client, endpoint, is_transient_status, parse_json, transport_error};
use crate::types::{GoogleDirectionsResponse, Route};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
const DIRECTIONS_PATH: &str = "maps/api/directions/json";
const BACKEND: &str = "google";

/// Google Directions client. Same construction pattern as [`crate::OrsClient`].
pub struct GoogleClient {
    client: Client,
    api_key: String,
    directions_url: Url,
}

impl GoogleClient {
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, OracleError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

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
    /// Google reports most failures in the JSON `status` field of an HTTP 200.
    ///
    /// # Errors
    ///
    /// - [`OracleError::InvalidCoordinate`] before any request if either point is invalid.
    /// - [`OracleError::Unavailable`] on network failure, HTTP 429/5xx,
    ///   `OVER_QUERY_LIMIT`, or `UNKNOWN_ERROR`.
    /// - [`OracleError::NoRoute`] on `ZERO_RESULTS`, `NOT_FOUND`, or an empty route list.
    /// - [`OracleError::Rejected`] on other statuses or non-2xx responses.
    /// - [`OracleError::Deserialize`] if the body is not the expected JSON.
    pub async fn route(&self, from: Coordinate, to: Coordinate) -> Result<Route, OracleError> {
        from.validate()?;
        to.validate()?;

        let url = self.build_url(from, to);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(BACKEND, &e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(BACKEND, &e))?;

        if is_transient_status(status) {
            return Err(OracleError::Unavailable {
                backend: BACKEND,
                reason: format!("HTTP {status}"),
            });
        }
        if !status.is_success() {
            return Err(OracleError::Rejected {
                backend: BACKEND,
                status: Some(status.as_u16()),
                message: body.chars().take(200).collect(),
            });
        }

        let parsed: GoogleDirectionsResponse = parse_json(&body, "Google directions response")?;
        interpret(parsed)
    }

    fn build_url(&self, from: Coordinate, to: Coordinate) -> Url {
        let mut url = self.directions_url.clone();
        url.query_pairs_mut()
            .append_pair("origin", &format!("{},{}", from.lat, from.lon))
            .append_pair("destination", &format!("{},{}", to.lat, to.lon))
            .append_pair("mode", "driving")
            .append_pair("key", &self.api_key);
        url
    }
}

fn interpret(response: GoogleDirectionsResponse) -> Result<Route, OracleError> {
    let detail = || {
        response
            .error_message
            .clone()
            .unwrap_or_else(|| response.status.clone())
    };

    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => {
            return Err(OracleError::NoRoute {
                backend: BACKEND,
                reason: detail(),
            })
        }
        "OVER_QUERY_LIMIT" | "UNKNOWN_ERROR" => {
            return Err(OracleError::Unavailable {
                backend: BACKEND,
                reason: detail(),
            })
        }
        _ => {
            return Err(OracleError::Rejected {
                backend: BACKEND,
                status: None,
                message: detail(),
            })
        }
    }

    response
        .routes
        .first()
        .and_then(|route| route.legs.first())
        .map(|leg| Route::from_meters_seconds(leg.distance.value, leg.duration.value))
        .ok_or_else(|| OracleError::NoRoute {
            backend: BACKEND,
            reason: "status OK but no route legs returned".to_owned(),
        })
}
