//! Range flags shared by `analyze` and `filter`.

use clap::Args;
use revlens_core::{ReviewFilter, ReviewRecord};

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct RangeArgs {
    /// Earliest review time, Unix seconds (inclusive)
    #[arg(long)]
    pub from: Option<i64>,

    /// Latest review time, Unix seconds (inclusive)
    #[arg(long)]
    pub to: Option<i64>,

    /// Lowest sentiment score to keep (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    pub min_sentiment: Option<f32>,

    /// Highest sentiment score to keep (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    pub max_sentiment: Option<f32>,
}

impl RangeArgs {
    /// Fill absent bounds from the spanning range of `records`.
    ///
    /// With no scored records there is nothing to span, so absent bounds are
    /// fully open (every time, the whole `[-1, 1]` score range).
    pub(crate) fn resolve<'a, I>(&self, records: I) -> ReviewFilter
    where
        I: IntoIterator<Item = &'a ReviewRecord>,
    {
        let (t_lo, t_hi, s_lo, s_hi) = match ReviewFilter::spanning(records) {
            Some(span) => (
                *span.time.start(),
                *span.time.end(),
                *span.sentiment.start(),
                *span.sentiment.end(),
            ),
            None => (i64::MIN, i64::MAX, -1.0, 1.0),
        };

        ReviewFilter::new(
            self.from.unwrap_or(t_lo)..=self.to.unwrap_or(t_hi),
            self.min_sentiment.unwrap_or(s_lo)..=self.max_sentiment.unwrap_or(s_hi),
        )
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.from.is_none()
            && self.to.is_none()
            && self.min_sentiment.is_none()
            && self.max_sentiment.is_none()
    }
}

#[cfg(test)]
mod tests {
    use revlens_core::{PlaceInfo, RawReview, ReviewSet};

    use super::*;

    fn scored_set() -> ReviewSet {
        let place = PlaceInfo {
            name: "Corner Cafe".to_string(),
            address: "1 Main St".to_string(),
            rating: Some(4.0),
        };
        let mut set = ReviewSet::new(
            place,
            vec![
                RawReview::new("good", 1000),
                RawReview::new("bad", 3000),
                RawReview::new("meh", 2000),
            ],
        );
        for (record, score) in set.records_mut().iter_mut().zip([0.6, -0.4, 0.1]) {
            record.record_score(score);
        }
        set
    }

    #[test]
    fn absent_bounds_span_the_data() {
        let set = scored_set();
        let filter = RangeArgs::default().resolve(&set);
        assert_eq!(filter.time, 1000..=3000);
        assert_eq!(filter.sentiment, -0.4..=0.6);
        assert_eq!(filter.apply(&set).len(), 3);
    }

    #[test]
    fn explicit_bounds_override_the_span() {
        let set = scored_set();
        let args = RangeArgs {
            from: Some(1500),
            min_sentiment: Some(0.0),
            ..RangeArgs::default()
        };
        let filter = args.resolve(&set);
        assert_eq!(filter.time, 1500..=3000);
        assert_eq!(filter.sentiment, 0.0..=0.6);

        let kept: Vec<i64> = filter.apply(&set).iter().map(|r| r.timestamp()).collect();
        assert_eq!(kept, vec![2000]);
    }

    #[test]
    fn unscored_data_resolves_to_open_bounds() {
        let place = PlaceInfo {
            name: "Empty".to_string(),
            address: String::new(),
            rating: None,
        };
        let set = ReviewSet::new(place, vec![RawReview::new("x", 5)]);
        let filter = RangeArgs::default().resolve(&set);
        assert_eq!(filter.time, i64::MIN..=i64::MAX);
        assert_eq!(filter.sentiment, -1.0..=1.0);
        assert!(filter.apply(&set).is_empty(), "pending records never match");
    }

    #[test]
    fn is_empty_only_without_flags() {
        assert!(RangeArgs::default().is_empty());
        let args = RangeArgs {
            to: Some(10),
            ..RangeArgs::default()
        };
        assert!(!args.is_empty());
    }
}
