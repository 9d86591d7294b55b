use std::path::PathBuf;
use thiserror::Error;

/// Convenience result type for loading, filtering and aggregation.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type shared by the loader, the filter stage and the aggregators.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The trip file could not be opened.
    #[error("trip data unavailable at '{path}': {source}")]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Low-level CSV read failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the header row.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A cell could not be parsed. Fatal for the whole load.
    #[error("malformed record at row {row} column '{column}': {message} (raw='{raw}')")]
    MalformedRecord {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// An aggregator was handed an empty kept set.
    #[error("insufficient data: no trips left for {stage} statistics")]
    InsufficientData { stage: &'static str },

    /// A month or weekday outside the accepted names.
    #[error("invalid {kind} filter '{value}'")]
    InvalidFilter { kind: &'static str, value: String },

    /// The city is not part of the configured catalog.
    #[error("unknown city '{0}'")]
    UnknownCity(String),

    /// The city catalog file could not be parsed.
    #[error("invalid city catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, AnalysisError::InsufficientData { .. })
    }
}
