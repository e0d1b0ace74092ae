//! Plumbing shared by the HTTP backends.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::OracleError;

pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, OracleError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Parses `base_url` and joins `path` onto it.
///
/// The base is normalised to end in exactly one slash so `join` appends to
/// it rather than replacing its last segment.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, OracleError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised)
        .and_then(|base| base.join(path))
        .map_err(|e| OracleError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })
}

/// Every transport-level failure is transient from the caller's point of view.
pub(crate) fn transport_error(backend: &'static str, err: &reqwest::Error) -> OracleError {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    OracleError::Unavailable {
        backend,
        reason: format!("{kind}: {err}"),
    }
}

/// 429 and 5xx mean "try again later" for every backend.
pub(crate) fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    body: &str,
    context: &str,
) -> Result<T, OracleError> {
    serde_json::from_str(body).map_err(|e| OracleError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
