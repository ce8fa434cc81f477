use revlens_core::{EnrichmentFailure, FailureKind};
use thiserror::Error;

/// Errors building a sentiment client. Per-review scoring failures are
/// [`OracleError`]s instead.
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Why the oracle could not score one piece of text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("sentiment request timed out: {0}")]
    Timeout(String),

    #[error("text rejected by sentiment oracle: {0}")]
    InvalidInput(String),

    #[error("sentiment quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("sentiment oracle error: {0}")]
    Unknown(String),
}

impl OracleError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            OracleError::Timeout(_) => FailureKind::Timeout,
            OracleError::InvalidInput(_) => FailureKind::InvalidInput,
            OracleError::QuotaExceeded(_) => FailureKind::QuotaExceeded,
            OracleError::Unknown(_) => FailureKind::Unknown,
        }
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            OracleError::Timeout(d)
            | OracleError::InvalidInput(d)
            | OracleError::QuotaExceeded(d)
            | OracleError::Unknown(d) => d,
        }
    }
}

impl From<OracleError> for EnrichmentFailure {
    fn from(err: OracleError) -> Self {
        EnrichmentFailure::new(err.kind(), err.detail())
    }
}
