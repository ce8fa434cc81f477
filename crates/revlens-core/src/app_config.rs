use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub google_maps_api_key: Option<String>,
    pub google_language_api_key: Option<String>,
    pub places_base_url: String,
    pub language_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Minimum interval between consecutive sentiment oracle calls. `0` disables pacing.
    pub pacing_interval_ms: u64,
    pub upstream_max_retries: u32,
    pub upstream_retry_backoff_ms: u64,
    pub output_dir: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "google_language_api_key",
                &self.google_language_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("language_base_url", &self.language_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("pacing_interval_ms", &self.pacing_interval_ms)
            .field("upstream_max_retries", &self.upstream_max_retries)
            .field(
                "upstream_retry_backoff_ms",
                &self.upstream_retry_backoff_ms,
            )
            .field("output_dir", &self.output_dir)
            .finish()
    }
}
