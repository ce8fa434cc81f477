//! Sentiment enrichment for place reviews.
//!
//! Scores each review of a [`revlens_core::ReviewSet`] through a
//! [`SentimentOracle`], one call at a time with configurable pacing, and
//! records per-review failures without aborting the run. Ships two oracles:
//! the Google Cloud Natural Language API and an offline review lexicon.

pub mod error;
pub mod language;
pub mod oracle;
pub mod pacing;
pub mod pipeline;
pub mod progress;
pub mod scorer;

pub use error::{OracleError, SentimentError};
pub use language::GoogleLanguageClient;
pub use oracle::SentimentOracle;
pub use pacing::PacingPolicy;
pub use pipeline::{run_location, EnrichmentPipeline, EnrichmentSummary};
pub use progress::{LogProgress, NoProgress, ProgressReporter};
pub use scorer::{lexicon_score, LexiconOracle};
pub use tokio_util::sync::CancellationToken;
