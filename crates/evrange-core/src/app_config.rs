use std::time::Duration;

/// Process-wide settings loaded once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub ors_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub ors_base_url: Option<String>,
    pub google_base_url: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_searches: usize,
    pub max_oracle_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub deadline_secs: Option<u64>,
}

impl AppConfig {
    /// Overall per-request deadline, if configured.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "ors_api_key",
                &self.ors_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("ors_base_url", &self.ors_base_url)
            .field("google_base_url", &self.google_base_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_searches", &self.max_concurrent_searches)
            .field("max_oracle_retries", &self.max_oracle_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("deadline_secs", &self.deadline_secs)
            .finish()
    }
}
