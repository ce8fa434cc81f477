//! Time and sentiment range selection over enriched records.
//!
//! Both bounds are inclusive. Records without a sentiment score (failed or
//! pending) never match, since they cannot satisfy the sentiment predicate.

use std::ops::RangeInclusive;

use crate::reviews::ReviewRecord;

/// Inclusive time and sentiment bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewFilter {
    /// Seconds since the Unix epoch.
    pub time: RangeInclusive<i64>,
    pub sentiment: RangeInclusive<f32>,
}

impl ReviewFilter {
    #[must_use]
    pub fn new(time: RangeInclusive<i64>, sentiment: RangeInclusive<f32>) -> Self {
        Self { time, sentiment }
    }

    /// The smallest filter that still selects every scored record.
    ///
    /// Returns `None` when no record carries a sentiment score.
    pub fn spanning<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ReviewRecord>,
    {
        let mut bounds: Option<(i64, i64, f32, f32)> = None;
        for (time, score) in sentiment_series(records) {
            bounds = Some(match bounds {
                None => (time, time, score, score),
                Some((t_lo, t_hi, s_lo, s_hi)) => (
                    t_lo.min(time),
                    t_hi.max(time),
                    s_lo.min(score),
                    s_hi.max(score),
                ),
            });
        }
        bounds.map(|(t_lo, t_hi, s_lo, s_hi)| Self::new(t_lo..=t_hi, s_lo..=s_hi))
    }

    #[must_use]
    pub fn matches(&self, record: &ReviewRecord) -> bool {
        self.time.contains(&record.timestamp())
            && record
                .sentiment()
                .is_some_and(|score| self.sentiment.contains(&score))
    }

    /// Matching records in their original relative order.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a ReviewRecord>
    where
        I: IntoIterator<Item = &'a ReviewRecord>,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Select records with `timestamp` in `time` and `sentiment` in `sentiment`.
pub fn filter_reviews<'a, I>(
    records: I,
    time: RangeInclusive<i64>,
    sentiment: RangeInclusive<f32>,
) -> Vec<&'a ReviewRecord>
where
    I: IntoIterator<Item = &'a ReviewRecord>,
{
    ReviewFilter::new(time, sentiment).apply(records)
}

/// `(timestamp, sentiment)` pairs of the scored records, in record order.
pub fn sentiment_series<'a, I>(records: I) -> Vec<(i64, f32)>
where
    I: IntoIterator<Item = &'a ReviewRecord>,
{
    records
        .into_iter()
        .filter_map(|r| r.sentiment().map(|score| (r.timestamp(), score)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::{EnrichmentFailure, FailureKind, PlaceInfo, RawReview, ReviewSet};

    fn place() -> PlaceInfo {
        PlaceInfo {
            name: "Corner Cafe".to_string(),
            address: "1 Main St".to_string(),
            rating: None,
        }
    }

    /// `[("Great!", 1000) -> 0.9, ("", 2000) -> invalid_input]`
    fn enriched_example() -> ReviewSet {
        let mut set = ReviewSet::new(
            place(),
            vec![RawReview::new("Great!", 1000), RawReview::new("", 2000)],
        );
        let records = set.records_mut();
        records[0].record_score(0.9);
        records[1].record_failure(EnrichmentFailure::new(FailureKind::InvalidInput, "empty"));
        set
    }

    fn scored(pairs: &[(i64, f32)]) -> ReviewSet {
        let mut set = ReviewSet::new(
            place(),
            pairs
                .iter()
                .map(|&(t, _)| RawReview::new(format!("review at {t}"), t))
                .collect(),
        );
        for (record, &(_, s)) in set.records_mut().iter_mut().zip(pairs) {
            record.record_score(s);
        }
        set
    }

    #[test]
    fn single_instant_window_selects_only_that_record() {
        let set = enriched_example();
        let selected = filter_reviews(&set, 1000..=1000, -1.0..=1.0);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0], &set.records()[0]);
    }

    #[test]
    fn failed_records_never_match() {
        let set = enriched_example();
        let selected = filter_reviews(&set, i64::MIN..=i64::MAX, -1.0..=1.0);
        assert_eq!(selected.len(), 1);
        assert!(selected.iter().all(|r| r.sentiment().is_some()));
    }

    #[test]
    fn pending_records_never_match() {
        let set = ReviewSet::new(place(), vec![RawReview::new("unscored", 5)]);
        assert!(filter_reviews(&set, 0..=10, -1.0..=1.0).is_empty());
    }

    #[test]
    fn bounds_are_inclusive_on_both_ends() {
        let set = scored(&[(100, -0.5), (200, 0.0), (300, 0.5)]);
        let selected = filter_reviews(&set, 100..=300, -0.5..=0.5);
        assert_eq!(selected.len(), 3);

        let upper_time = filter_reviews(&set, 250..=300, -1.0..=1.0);
        assert_eq!(upper_time.len(), 1);
        assert_eq!(upper_time[0].timestamp(), 300);

        let upper_score = filter_reviews(&set, 0..=1000, 0.5..=0.5);
        assert_eq!(upper_score.len(), 1);
        assert_eq!(upper_score[0].sentiment(), Some(0.5));
    }

    #[test]
    fn preserves_relative_order_of_unsorted_input() {
        let set = scored(&[(300, 0.1), (100, 0.2), (250, -0.9), (200, 0.3)]);
        let selected = filter_reviews(&set, 150..=300, 0.0..=1.0);
        let times: Vec<i64> = selected.iter().map(|r| r.timestamp()).collect();
        assert_eq!(times, vec![300, 200]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let set = scored(&[(10, 0.9), (20, -0.2), (30, 0.4), (40, 0.0), (50, -1.0)]);
        let filter = ReviewFilter::new(15..=45, -0.5..=0.5);
        let once = filter.apply(&set);
        let twice = filter.apply(once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let set = scored(&[(10, 0.9)]);
        assert!(filter_reviews(&set, 11..=20, -1.0..=1.0).is_empty());
    }

    #[test]
    fn spanning_covers_only_scored_records() {
        let mut set = scored(&[(500, 0.7), (100, -0.3), (900, 0.1)]);
        set.records_mut()[2].record_failure(EnrichmentFailure::new(FailureKind::Timeout, ""));
        let span = ReviewFilter::spanning(&set).unwrap();
        assert_eq!(span.time, 100..=500);
        assert_eq!(span.sentiment, -0.3..=0.7);
        assert_eq!(span.apply(&set).len(), 2);
    }

    #[test]
    fn spanning_is_none_without_scores() {
        let set = enriched_example();
        let mut unscored = set.clone();
        unscored.records_mut()[0]
            .record_failure(EnrichmentFailure::new(FailureKind::Unknown, ""));
        assert!(ReviewFilter::spanning(&unscored).is_none());
    }

    #[test]
    fn series_skips_unscored_records_and_keeps_order() {
        let set = enriched_example();
        assert_eq!(sentiment_series(&set), vec![(1000, 0.9)]);
    }
}
