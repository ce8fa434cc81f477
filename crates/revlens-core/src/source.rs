use async_trait::async_trait;

use crate::error::UpstreamUnavailable;
use crate::reviews::ReviewSet;

/// Upstream provider of a place's metadata and raw reviews.
///
/// Implementations resolve a free-text location to a single place and build
/// a fresh [`ReviewSet`] for it. A place that exists but has no reviews is an
/// empty set, not an error.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// # Errors
    ///
    /// Returns [`UpstreamUnavailable`] when the location cannot be resolved
    /// or the upstream service does not return usable data.
    async fn fetch_reviews(&self, location: &str) -> Result<ReviewSet, UpstreamUnavailable>;
}
