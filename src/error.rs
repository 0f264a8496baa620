//! Error types for the txt-insights library.
//!
//! This module provides custom error types using `thiserror` for the
//! ingestion and extraction stages, which are the only stages of the
//! pipeline that can fail on well-formed input.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while analysing a conversation.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// No source file in the directory matched the contact substring
    #[error("No CSV files found with the contact name '{contact}' in the file name under {}", directory.display())]
    NoMatchingFiles {
        /// Contact substring given by the operator
        contact: String,
        /// Directory that was searched
        directory: PathBuf,
    },

    /// Matched files contained no usable rows
    #[error("No usable messages: every matched row was empty or missing text")]
    EmptyBatch,

    /// A timestamp could not be parsed as a date-time
    #[error("Invalid timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// A required column is missing from a source file header
    #[error("Column '{column}' missing from {}", file.display())]
    MissingColumn {
        /// File whose header lacks the column
        file: PathBuf,
        /// Name of the missing column
        column: String,
    },

    /// CSV parsing or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Chart rendering failures
    #[error("Render error: {0}")]
    Render(String),
}

/// Convenience type alias for Result with `InsightsError`
pub type Result<T> = std::result::Result<T, InsightsError>;

impl InsightsError {
    /// Short, stable label used for metrics and exit reporting
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoMatchingFiles { .. } => "no_matching_files",
            Self::EmptyBatch => "empty_batch",
            Self::MalformedTimestamp(_) => "malformed_timestamp",
            Self::MissingColumn { .. } => "missing_column",
            Self::Csv(_) => "csv",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Render(_) => "render",
        }
    }
}
