use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to turn a source file into a [`Dataset`](super::Dataset).
///
/// Loading fails fast: the first offending row aborts the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("expected a top-level array of records")]
    NotAnArray,

    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: field '{field}' has unsupported type {found}")]
    FieldType {
        row: usize,
        field: &'static str,
        found: String,
    },

    #[error("row {row}: unparseable date '{value}'")]
    InvalidDate { row: usize, value: String },
}

/// Rejection of a [`FilterCriteria`](super::FilterCriteria) by
/// [`validate`](super::FilterCriteria::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}
