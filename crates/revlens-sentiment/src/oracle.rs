use async_trait::async_trait;

use crate::error::OracleError;

/// Black-box text-to-sentiment scorer.
///
/// Must accept any text, including the empty string, and either return a
/// score (nominally in `[-1.0, 1.0]`) or a classified [`OracleError`].
/// Implementations do not retry; that is the caller's call.
#[async_trait]
pub trait SentimentOracle: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`OracleError`] when the text cannot be scored.
    async fn score(&self, text: &str) -> Result<f32, OracleError>;
}
