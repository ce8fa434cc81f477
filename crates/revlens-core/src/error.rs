use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// The upstream review source could not resolve the location or returned no
/// usable data. Fatal for the whole run: nothing is enriched or written.
#[derive(Debug, Error)]
#[error("reviews unavailable for \"{location}\": {reason}")]
pub struct UpstreamUnavailable {
    pub location: String,
    pub reason: String,
}

impl UpstreamUnavailable {
    pub fn new(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            reason: reason.into(),
        }
    }
}
