//! Shared types for revlens: configuration, the review data model, range
//! filtering, and the upstream review source contract.

pub mod app_config;
pub mod config;
pub mod error;
pub mod filter;
pub mod reviews;
pub mod source;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, UpstreamUnavailable};
pub use filter::{filter_reviews, sentiment_series, ReviewFilter};
pub use reviews::{
    Enrichment, EnrichmentFailure, FailureKind, PlaceInfo, RawReview, ReviewRecord, ReviewSet,
    UnknownFailureKind,
};
pub use source::ReviewSource;
