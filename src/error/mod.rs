//! Error handling for the pipeline.
//!
//! Row-level data-quality problems (null keys, invalid amounts, unknown
//! countries, orphan references) are never errors; the cleaning stage filters
//! them silently. The variants here cover pipeline-fatal conditions only, so
//! a caller can distinguish a missing input from bad configuration or an
//! unusable data shape.

use std::io;
use std::path::PathBuf;

/// Specialized error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required input source does not exist or could not be opened
    #[error("missing input source {path:?}: {source}")]
    MissingInput {
        /// Path of the source that could not be opened
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source exists but deserialized to zero rows
    #[error("input source {0:?} is empty")]
    EmptySource(PathBuf),

    /// A source's header row lacks a column the pipeline cannot run without
    #[error("input source {path:?} is missing mandatory column {column:?}")]
    MissingColumn {
        /// Path of the malformed source
        path: PathBuf,
        /// Name of the absent column
        column: String,
    },

    /// A required configuration parameter is missing or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// A source could not be decoded as CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
