use crate::app_config::AppConfig;
use crate::types::Backend;
use crate::ConfigError;

pub const ORS_API_KEY_VAR: &str = "ORS_API_KEY";
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric value cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric value cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Returns the API key for `backend`, failing if it was not configured.
///
/// A missing key is a startup error, so callers check this before building
/// any oracle client.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] naming the variable for `backend`.
pub fn require_api_key(config: &AppConfig, backend: Backend) -> Result<&str, ConfigError> {
    let (key, var) = match backend {
        Backend::OpenRouteService => (config.ors_api_key.as_deref(), ORS_API_KEY_VAR),
        Backend::Google => (config.google_api_key.as_deref(), GOOGLE_API_KEY_VAR),
    };
    key.ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values count as unset: `.env` templates often ship `KEY=`.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let ors_api_key = optional(ORS_API_KEY_VAR);
    let google_api_key = optional(GOOGLE_API_KEY_VAR);
    let ors_base_url = optional("EVRANGE_ORS_BASE_URL");
    let google_base_url = optional("EVRANGE_GOOGLE_BASE_URL");

    let log_level = or_default("EVRANGE_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("EVRANGE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("EVRANGE_USER_AGENT", "evrange/0.1 (reachability-estimator)");

    let max_concurrent_searches = parse_usize("EVRANGE_MAX_CONCURRENT_SEARCHES", "4")?;
    if max_concurrent_searches == 0 {
        return Err(invalid(
            "EVRANGE_MAX_CONCURRENT_SEARCHES",
            "must be at least 1".to_string(),
        ));
    }
    let max_oracle_retries = parse_u32("EVRANGE_MAX_ORACLE_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("EVRANGE_RETRY_BACKOFF_BASE_MS", "500")?;

    let deadline_secs = match optional("EVRANGE_DEADLINE_SECS") {
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| invalid("EVRANGE_DEADLINE_SECS", e.to_string()))?,
        ),
        None => None,
    };

    Ok(AppConfig {
        ors_api_key,
        google_api_key,
        ors_base_url,
        google_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        max_concurrent_searches,
        max_oracle_retries,
        retry_backoff_base_ms,
        deadline_secs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;
    use std::time::Duration;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_uses_defaults_on_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.ors_api_key.is_none());
        assert!(cfg.google_api_key.is_none());
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "evrange/0.1 (reachability-estimator)");
        assert_eq!(cfg.max_concurrent_searches, 4);
        assert_eq!(cfg.max_oracle_retries, 2);
        assert_eq!(cfg.retry_backoff_base_ms, 500);
        assert!(cfg.deadline().is_none());
    }

    #[test]
    fn build_app_config_reads_keys_and_overrides() {
        let mut map = HashMap::new();
        map.insert("ORS_API_KEY", "ors-key");
        map.insert("GOOGLE_API_KEY", "g-key");
        map.insert("EVRANGE_MAX_CONCURRENT_SEARCHES", "8");
        map.insert("EVRANGE_DEADLINE_SECS", "90");
        map.insert("EVRANGE_ORS_BASE_URL", "http://localhost:8080");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.ors_api_key.as_deref(), Some("ors-key"));
        assert_eq!(cfg.google_api_key.as_deref(), Some("g-key"));
        assert_eq!(cfg.max_concurrent_searches, 8);
        assert_eq!(cfg.deadline(), Some(Duration::from_secs(90)));
        assert_eq!(cfg.ors_base_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut map = HashMap::new();
        map.insert("ORS_API_KEY", "   ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.ors_api_key.is_none());
    }

    #[test]
    fn build_app_config_rejects_invalid_timeout() {
        let mut map = HashMap::new();
        map.insert("EVRANGE_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EVRANGE_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(EVRANGE_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_concurrency() {
        let mut map = HashMap::new();
        map.insert("EVRANGE_MAX_CONCURRENT_SEARCHES", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EVRANGE_MAX_CONCURRENT_SEARCHES"),
            "got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_invalid_deadline() {
        let mut map = HashMap::new();
        map.insert("EVRANGE_DEADLINE_SECS", "-5");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn require_api_key_names_missing_variable() {
        let mut map = HashMap::new();
        map.insert("ORS_API_KEY", "ors-key");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            require_api_key(&cfg, Backend::OpenRouteService).unwrap(),
            "ors-key"
        );
        assert_eq!(
            require_api_key(&cfg, Backend::Google),
            Err(ConfigError::MissingEnvVar("GOOGLE_API_KEY".to_string()))
        );
    }

    #[test]
    fn debug_output_redacts_api_keys() {
        let mut map = HashMap::new();
        map.insert("ORS_API_KEY", "super-secret");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
