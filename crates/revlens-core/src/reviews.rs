//! Review records and the per-location review set.
//!
//! A [`ReviewSet`] is built once from upstream data and then only touched by
//! the enrichment pipeline, which attaches a sentiment score or a failure to
//! each record through [`ReviewRecord::record_score`] and
//! [`ReviewRecord::record_failure`]. Upstream fields are never mutable after
//! construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One review exactly as the upstream source returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    pub author_name: Option<String>,
    pub author_url: Option<String>,
    pub language: Option<String>,
    pub profile_photo_url: Option<String>,
    pub rating: Option<f64>,
    pub relative_time_description: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Seconds since the Unix epoch.
    pub time: i64,
}

impl RawReview {
    /// A review with only the required fields set.
    pub fn new(text: impl Into<String>, time: i64) -> Self {
        Self {
            author_name: None,
            author_url: None,
            language: None,
            profile_photo_url: None,
            rating: None,
            relative_time_description: None,
            text: text.into(),
            time,
        }
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// Classified reason a record could not be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Timeout,
    InvalidInput,
    QuotaExceeded,
    Unknown,
}

impl FailureKind {
    /// Stable tag used in persisted output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::InvalidInput => "invalid_input",
            FailureKind::QuotaExceeded => "quota_exceeded",
            FailureKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown failure kind \"{0}\"")]
pub struct UnknownFailureKind(pub String);

impl FromStr for FailureKind {
    type Err = UnknownFailureKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timeout" => Ok(FailureKind::Timeout),
            "invalid_input" => Ok(FailureKind::InvalidInput),
            "quota_exceeded" => Ok(FailureKind::QuotaExceeded),
            "unknown" => Ok(FailureKind::Unknown),
            other => Err(UnknownFailureKind(other.to_string())),
        }
    }
}

/// Error descriptor attached to a record whose scoring failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl EnrichmentFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for EnrichmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.detail)
        }
    }
}

/// Enrichment state of a single record.
///
/// `Pending` is distinct from a zero score: it means the oracle was never
/// consulted (or the run was cancelled first).
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    Pending,
    Scored(f32),
    Failed(EnrichmentFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    raw: RawReview,
    enrichment: Enrichment,
}

impl ReviewRecord {
    #[must_use]
    pub fn new(raw: RawReview) -> Self {
        Self {
            raw,
            enrichment: Enrichment::Pending,
        }
    }

    /// Rebuild a record whose enrichment state is already known, e.g. when
    /// reading persisted output back in. A `Scored` state goes through
    /// [`Self::record_score`], so the score invariant holds here too.
    #[must_use]
    pub fn from_parts(raw: RawReview, enrichment: Enrichment) -> Self {
        let mut record = Self::new(raw);
        match enrichment {
            Enrichment::Pending => {}
            Enrichment::Scored(score) => record.record_score(score),
            Enrichment::Failed(failure) => record.record_failure(failure),
        }
        record
    }

    #[must_use]
    pub fn raw(&self) -> &RawReview {
        &self.raw
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.raw.text
    }

    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.raw.time
    }

    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        self.raw.rating
    }

    #[must_use]
    pub fn enrichment(&self) -> &Enrichment {
        &self.enrichment
    }

    #[must_use]
    pub fn sentiment(&self) -> Option<f32> {
        match self.enrichment {
            Enrichment::Scored(score) => Some(score),
            _ => None,
        }
    }

    #[must_use]
    pub fn enrichment_error(&self) -> Option<&EnrichmentFailure> {
        match &self.enrichment {
            Enrichment::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.enrichment, Enrichment::Pending)
    }

    /// Attach a sentiment score, clamped to `[-1.0, 1.0]`. Replaces any
    /// earlier failure.
    ///
    /// A NaN or infinite score is not a score: it is recorded as an
    /// [`FailureKind::Unknown`] failure instead.
    pub fn record_score(&mut self, score: f32) {
        self.enrichment = if score.is_finite() {
            Enrichment::Scored(score.clamp(-1.0, 1.0))
        } else {
            Enrichment::Failed(EnrichmentFailure::new(
                FailureKind::Unknown,
                format!("non-finite score {score}"),
            ))
        };
    }

    /// Attach a scoring failure. Replaces any earlier score.
    pub fn record_failure(&mut self, failure: EnrichmentFailure) {
        self.enrichment = Enrichment::Failed(failure);
    }
}

/// Metadata shared by every record of a [`ReviewSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceInfo {
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
}

/// Ordered reviews for one place.
///
/// Record order is the upstream order and is never changed. Records can be
/// updated in place through [`ReviewSet::records_mut`] but not added or
/// removed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSet {
    place: PlaceInfo,
    records: Vec<ReviewRecord>,
}

impl ReviewSet {
    /// Build a set of not-yet-enriched records.
    #[must_use]
    pub fn new(place: PlaceInfo, reviews: Vec<RawReview>) -> Self {
        Self {
            place,
            records: reviews.into_iter().map(ReviewRecord::new).collect(),
        }
    }

    #[must_use]
    pub fn from_records(place: PlaceInfo, records: Vec<ReviewRecord>) -> Self {
        Self { place, records }
    }

    #[must_use]
    pub fn place(&self) -> &PlaceInfo {
        &self.place
    }

    #[must_use]
    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [ReviewRecord] {
        &mut self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReviewRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Indices of records whose last scoring attempt failed, in set order.
    #[must_use]
    pub fn failed_indices(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.enrichment_error().is_some())
            .map(|(i, _)| i)
            .collect()
    }

    #[must_use]
    pub fn scored_count(&self) -> usize {
        self.records.iter().filter(|r| r.sentiment().is_some()).count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.enrichment_error().is_some())
            .count()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_pending()).count()
    }
}

impl<'a> IntoIterator for &'a ReviewSet {
    type Item = &'a ReviewRecord;
    type IntoIter = std::slice::Iter<'a, ReviewRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
