//! CSV persistence of enriched review sets.
//!
//! One row per review. Place metadata is repeated on every row so a file
//! stands alone; the enrichment state is encoded by which of `sentiment` and
//! `enrichment_error` is filled (neither means the review was never scored).

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use revlens_core::{
    Enrichment, EnrichmentFailure, FailureKind, PlaceInfo, RawReview, ReviewRecord, ReviewSet,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const HEADER: [&str; 13] = [
    "author_name",
    "author_url",
    "language",
    "profile_photo_url",
    "rating",
    "relative_time_description",
    "text",
    "time",
    "place_name",
    "place_address",
    "place_rating",
    "sentiment",
    "enrichment_error",
];

const FILE_SUFFIX: &str = "_reviews.csv";

#[derive(Debug, Error)]
pub(crate) enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unknown enrichment_error tag \"{tag}\"")]
    UnknownFailureKind { row: usize, tag: String },

    #[error("row {row}: sentiment {value} is outside [-1, 1]")]
    InvalidSentiment { row: usize, value: f32 },
}

/// Field order matches [`HEADER`].
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    author_name: Option<String>,
    author_url: Option<String>,
    language: Option<String>,
    profile_photo_url: Option<String>,
    rating: Option<f64>,
    relative_time_description: Option<String>,
    text: String,
    time: i64,
    place_name: String,
    place_address: String,
    place_rating: Option<f64>,
    sentiment: Option<f32>,
    enrichment_error: Option<String>,
}

impl CsvRow {
    fn from_record(place: &PlaceInfo, record: &ReviewRecord) -> Self {
        let raw = record.raw().clone();
        Self {
            author_name: raw.author_name,
            author_url: raw.author_url,
            language: raw.language,
            profile_photo_url: raw.profile_photo_url,
            rating: raw.rating,
            relative_time_description: raw.relative_time_description,
            text: raw.text,
            time: raw.time,
            place_name: place.name.clone(),
            place_address: place.address.clone(),
            place_rating: place.rating,
            sentiment: record.sentiment(),
            enrichment_error: record
                .enrichment_error()
                .map(|failure| failure.kind.as_str().to_string()),
        }
    }

    fn place(&self) -> PlaceInfo {
        PlaceInfo {
            name: self.place_name.clone(),
            address: self.place_address.clone(),
            rating: self.place_rating,
        }
    }

    fn into_record(self, row: usize) -> Result<ReviewRecord, ExportError> {
        let enrichment = match (self.sentiment, self.enrichment_error) {
            (Some(value), _) if !(-1.0..=1.0).contains(&value) => {
                // NaN fails the range check too.
                return Err(ExportError::InvalidSentiment { row, value });
            }
            (Some(score), _) => Enrichment::Scored(score),
            (None, Some(tag)) => {
                let kind: FailureKind = tag
                    .parse()
                    .map_err(|_| ExportError::UnknownFailureKind { row, tag })?;
                Enrichment::Failed(EnrichmentFailure::new(kind, ""))
            }
            (None, None) => Enrichment::Pending,
        };
        let raw = RawReview {
            author_name: self.author_name,
            author_url: self.author_url,
            language: self.language,
            profile_photo_url: self.profile_photo_url,
            rating: self.rating,
            relative_time_description: self.relative_time_description,
            text: self.text,
            time: self.time,
        };
        Ok(ReviewRecord::from_parts(raw, enrichment))
    }
}

/// `{dir}/{place_name}_reviews.csv`, with path separators in the name
/// replaced by `_`.
pub(crate) fn default_export_path(dir: &Path, place_name: &str) -> PathBuf {
    let stem: String = place_name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    let stem = if stem.is_empty() {
        "place".to_string()
    } else {
        stem
    };
    dir.join(format!("{stem}{FILE_SUFFIX}"))
}

/// Write `set` as CSV, header first. An empty set produces a header-only file.
pub(crate) fn write_reviews<W: io::Write>(out: W, set: &ReviewSet) -> Result<(), ExportError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(HEADER)?;
    for record in set {
        writer.serialize(CsvRow::from_record(set.place(), record))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Parse CSV written by [`write_reviews`].
///
/// Place metadata comes from the first row; `fallback_place` is used for a
/// header-only file. Failure details are not persisted, so failed records
/// come back with their kind only.
pub(crate) fn read_reviews<R: io::Read>(
    input: R,
    fallback_place: PlaceInfo,
) -> Result<ReviewSet, ExportError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);
    let mut place = None;
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        if place.is_none() {
            place = Some(row.place());
        }
        // 1-based data row number, header excluded.
        records.push(row.into_record(index + 1)?);
    }

    Ok(ReviewSet::from_records(
        place.unwrap_or(fallback_place),
        records,
    ))
}

/// Write `set` to [`default_export_path`] under `dir`, creating `dir` if needed.
pub(crate) fn save_review_set(dir: &Path, set: &ReviewSet) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = default_export_path(dir, &set.place().name);
    let file = File::create(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    write_reviews(file, set)?;
    tracing::info!(path = %path.display(), reviews = set.len(), "wrote reviews csv");
    Ok(path)
}

/// Read a reviews CSV from disk.
pub(crate) fn load_review_set(path: &Path) -> Result<ReviewSet, ExportError> {
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.strip_suffix(FILE_SUFFIX).unwrap_or(n).to_string())
        .unwrap_or_default();
    let fallback = PlaceInfo {
        name,
        address: String::new(),
        rating: None,
    };
    read_reviews(file, fallback)
}
