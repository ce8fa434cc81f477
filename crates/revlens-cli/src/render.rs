//! Plain-text rendering of review sets for the terminal.

use std::fmt::Write as _;

use chrono::DateTime;
use revlens_core::{ReviewFilter, ReviewRecord, ReviewSet};

const TEXT_WIDTH: usize = 60;

/// RFC 3339 in UTC, or the raw number if it is out of chrono's range.
pub(crate) fn format_time(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0).map_or_else(|| secs.to_string(), |dt| dt.to_rfc3339())
}

/// First line of `text`, cut to `max` characters with a trailing `...`.
fn truncate(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max && !text.contains('\n') {
        return line.to_string();
    }
    let cut: String = line.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

pub(crate) fn render_header(set: &ReviewSet) -> String {
    let place = set.place();
    let mut out = String::new();
    let _ = write!(out, "{}", place.name);
    if !place.address.is_empty() {
        let _ = write!(out, ", {}", place.address);
    }
    if let Some(rating) = place.rating {
        let _ = write!(out, " (rating {rating:.1})");
    }
    let _ = writeln!(
        out,
        "\n{} reviews: {} scored, {} failed, {} pending",
        set.len(),
        set.scored_count(),
        set.failed_count(),
        set.pending_count()
    );
    out
}

/// One row per record. Sentiment is blank for failed and pending records.
pub(crate) fn render_table<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a ReviewRecord>,
{
    let mut out = String::new();
    let _ = writeln!(out, "{:<27}{:<8}{:<11}TEXT", "TIME", "RATING", "SENTIMENT");
    for record in records {
        let rating = record
            .rating()
            .map(|r| format!("{r:.1}"))
            .unwrap_or_default();
        let sentiment = record
            .sentiment()
            .map(|s| format!("{s:.3}"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<27}{:<8}{:<11}{}",
            format_time(record.timestamp()),
            rating,
            sentiment,
            truncate(record.text(), TEXT_WIDTH)
        );
    }
    out
}

pub(crate) fn render_series(title: &str, series: &[(i64, f32)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title} ({} points)", series.len());
    for (time, score) in series {
        let _ = writeln!(out, "  {:<27}{score:.3}", format_time(*time));
    }
    out
}

/// Human-readable form of the resolved bounds.
pub(crate) fn describe_filter(filter: &ReviewFilter) -> String {
    let bound = |secs: i64| match secs {
        i64::MIN | i64::MAX => "*".to_string(),
        _ => format_time(secs),
    };
    format!(
        "time {}..={}, sentiment {:.3}..={:.3}",
        bound(*filter.time.start()),
        bound(*filter.time.end()),
        filter.sentiment.start(),
        filter.sentiment.end()
    )
}

/// Header, full table, full series and the filtered series, in that order.
pub(crate) fn render_report(set: &ReviewSet, filter: &ReviewFilter) -> String {
    let series = revlens_core::sentiment_series(set);
    let filtered = revlens_core::sentiment_series(filter.apply(set));
    let mut out = render_header(set);
    out.push('\n');
    out.push_str(&render_table(set));
    out.push('\n');
    out.push_str(&render_series("sentiment series", &series));
    out.push('\n');
    out.push_str(&render_series(
        &format!("filtered series, {}", describe_filter(filter)),
        &filtered,
    ));
    out
}

#[cfg(test)]
mod tests {
    use revlens_core::{EnrichmentFailure, FailureKind, PlaceInfo, RawReview};

    use super::*;

    fn example_set() -> ReviewSet {
        let place = PlaceInfo {
            name: "Corner Cafe".to_string(),
            address: "1 Main St".to_string(),
            rating: Some(4.3),
        };
        let mut set = ReviewSet::new(
            place,
            vec![
                RawReview::new("Great!", 1000).with_rating(5.0),
                RawReview::new("", 2000),
            ],
        );
        set.records_mut()[0].record_score(0.9);
        set.records_mut()[1].record_failure(EnrichmentFailure::new(FailureKind::InvalidInput, ""));
        set
    }

    #[test]
    fn time_is_rfc3339_utc() {
        assert_eq!(format_time(0), "1970-01-01T00:00:00+00:00");
        assert_eq!(format_time(1000), "1970-01-01T00:16:40+00:00");
    }

    #[test]
    fn out_of_range_time_falls_back_to_number() {
        assert_eq!(format_time(i64::MAX), i64::MAX.to_string());
    }

    #[test]
    fn header_summarises_place_and_counts() {
        let header = render_header(&example_set());
        assert!(header.starts_with("Corner Cafe, 1 Main St (rating 4.3)"), "{header}");
        assert!(header.contains("2 reviews: 1 scored, 1 failed, 0 pending"));
    }

    #[test]
    fn table_leaves_failed_sentiment_blank() {
        let set = example_set();
        let table = render_table(&set);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("TIME"));
        assert!(lines[1].contains("0.900"));
        assert!(lines[1].ends_with("Great!"));
        assert!(!lines[2].contains('.'), "failed row has no rating or score: {}", lines[2]);
    }

    #[test]
    fn long_and_multiline_text_is_truncated() {
        let long = "a".repeat(100);
        let cut = truncate(&long, 10);
        assert_eq!(cut, "aaaaaaa...");
        assert_eq!(truncate("first\nsecond", 60), "first...");
        assert_eq!(truncate("short", 60), "short");
    }

    #[test]
    fn series_lists_points_in_order() {
        let out = render_series("sentiment series", &[(1000, 0.9), (3000, -0.25)]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "sentiment series (2 points)");
        assert!(lines[1].ends_with("0.900"));
        assert!(lines[2].ends_with("-0.250"));
    }

    #[test]
    fn report_includes_full_and_filtered_series() {
        let set = example_set();
        let filter = ReviewFilter::new(0..=500, -1.0..=1.0);
        let report = render_report(&set, &filter);
        assert!(report.contains("sentiment series (1 points)"));
        assert!(report.contains("filtered series, time 1970-01-01T00:00:00+00:00..=1970-01-01T00:08:20+00:00"));
        assert!(report.trim_end().ends_with("(0 points)"), "{report}");
    }

    #[test]
    fn open_bounds_render_as_wildcards() {
        let filter = ReviewFilter::new(i64::MIN..=i64::MAX, -1.0..=1.0);
        assert_eq!(
            describe_filter(&filter),
            "time *..=*, sentiment -1.000..=1.000"
        );
    }
}
