//! Review enrichment orchestration.
//!
//! The pipeline takes a [`ReviewSet`] by value, scores each record in set
//! order with one oracle call at a time, and hands the set back inside an
//! [`EnrichmentSummary`]. A failing record is marked and skipped; it never
//! stops the run.

use std::sync::Arc;

use revlens_core::{EnrichmentFailure, FailureKind, ReviewSet, ReviewSource, UpstreamUnavailable};
use tokio_util::sync::CancellationToken;

use crate::oracle::SentimentOracle;
use crate::pacing::{Pacer, PacingPolicy};
use crate::progress::ProgressReporter;

/// Outcome of one enrichment run.
#[derive(Debug, Clone)]
pub struct EnrichmentSummary {
    /// The set that was passed in, with scores and failures attached.
    pub reviews: ReviewSet,
    pub succeeded: usize,
    pub failed: usize,
    /// Records left untouched because the run was cancelled first.
    pub skipped: usize,
    pub cancelled: bool,
}

impl EnrichmentSummary {
    fn untouched(reviews: ReviewSet) -> Self {
        Self {
            reviews,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            cancelled: false,
        }
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Sequential sentiment enrichment over a [`ReviewSet`].
pub struct EnrichmentPipeline {
    oracle: Arc<dyn SentimentOracle>,
    pacing: PacingPolicy,
    cancel: Option<CancellationToken>,
}

impl EnrichmentPipeline {
    /// Pipeline with the default pacing policy and no cancellation.
    #[must_use]
    pub fn new(oracle: Arc<dyn SentimentOracle>) -> Self {
        Self {
            oracle,
            pacing: PacingPolicy::default(),
            cancel: None,
        }
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    /// Check `token` before every oracle call and stop once it is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Score every record of `reviews`.
    ///
    /// Progress is reported after each record as `(i + 1) / total`; an empty
    /// set produces a single `1.0` report. Per-record oracle failures are
    /// stored on the record and counted, never returned.
    pub async fn enrich(
        &self,
        reviews: ReviewSet,
        reporter: &mut dyn ProgressReporter,
    ) -> EnrichmentSummary {
        let indices: Vec<usize> = (0..reviews.len()).collect();
        self.run(reviews, &indices, reporter).await
    }

    /// Score again only the records whose last attempt failed.
    ///
    /// Progress fractions are relative to the number of failed records.
    /// Records that already have a score are left alone.
    pub async fn enrich_failed(
        &self,
        reviews: ReviewSet,
        reporter: &mut dyn ProgressReporter,
    ) -> EnrichmentSummary {
        let indices = reviews.failed_indices();
        self.run(reviews, &indices, reporter).await
    }

    async fn run(
        &self,
        mut reviews: ReviewSet,
        indices: &[usize],
        reporter: &mut dyn ProgressReporter,
    ) -> EnrichmentSummary {
        let total = indices.len();
        if total == 0 {
            reporter.report(1.0, "no reviews to process (0/0)");
            return EnrichmentSummary::untouched(reviews);
        }

        tracing::info!(
            place = %reviews.place().name,
            total,
            "enriching reviews"
        );

        let mut summary_counts = (0usize, 0usize);
        let mut pacer = Pacer::new(self.pacing);

        for (position, &index) in indices.iter().enumerate() {
            if !self.wait_turn(&mut pacer).await {
                let skipped = total - position;
                tracing::warn!(
                    processed = position,
                    skipped,
                    "enrichment cancelled; remaining reviews left unscored"
                );
                let (succeeded, failed) = summary_counts;
                return EnrichmentSummary {
                    reviews,
                    succeeded,
                    failed,
                    skipped,
                    cancelled: true,
                };
            }

            let record = &mut reviews.records_mut()[index];
            let outcome = self.oracle.score(record.text()).await;
            match outcome {
                Ok(score) if score.is_finite() => {
                    record.record_score(score);
                    summary_counts.0 += 1;
                }
                Ok(score) => {
                    tracing::warn!(index, score, "oracle returned a non-finite score");
                    record.record_failure(EnrichmentFailure::new(
                        FailureKind::Unknown,
                        format!("non-finite score {score}"),
                    ));
                    summary_counts.1 += 1;
                }
                Err(err) => {
                    tracing::warn!(index, kind = %err.kind(), error = %err, "review scoring failed");
                    record.record_failure(err.into());
                    summary_counts.1 += 1;
                }
            }

            let done = position + 1;
            #[allow(clippy::cast_precision_loss)]
            let fraction = done as f64 / total as f64;
            reporter.report(fraction, &format!("processing review {done}/{total}"));
        }

        let (succeeded, failed) = summary_counts;
        tracing::info!(succeeded, failed, "enrichment complete");
        EnrichmentSummary {
            reviews,
            succeeded,
            failed,
            skipped: 0,
            cancelled: false,
        }
    }

    /// Wait for the pacer. Returns `false` if the run was cancelled before
    /// or while waiting.
    async fn wait_turn(&self, pacer: &mut Pacer) -> bool {
        let Some(token) = &self.cancel else {
            pacer.ready().await;
            return true;
        };
        if token.is_cancelled() {
            return false;
        }
        tokio::select! {
            biased;
            () = token.cancelled() => false,
            () = pacer.ready() => !token.is_cancelled(),
        }
    }
}

/// Fetch the reviews for `location` and enrich them.
///
/// An upstream failure short-circuits before any oracle call.
///
/// # Errors
///
/// Returns [`UpstreamUnavailable`] if `source` cannot produce a review set.
pub async fn run_location(
    source: &dyn ReviewSource,
    pipeline: &EnrichmentPipeline,
    location: &str,
    reporter: &mut dyn ProgressReporter,
) -> Result<EnrichmentSummary, UpstreamUnavailable> {
    let reviews = source.fetch_reviews(location).await?;
    tracing::info!(
        location,
        place = %reviews.place().name,
        reviews = reviews.len(),
        "fetched reviews"
    );
    Ok(pipeline.enrich(reviews, reporter).await)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
