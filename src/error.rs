//! Error types for lease clause processing.
//!
//! This module defines all error types that can occur while segmenting,
//! training, classifying and persisting lease clause models.

use std::path::PathBuf;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during clause processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation requires a fitted classifier
    #[error("{0}")]
    NotFitted(&'static str),

    /// Texts and labels are not parallel sequences
    #[error("Length mismatch: {texts} texts but {labels} labels")]
    LengthMismatch {
        /// Number of texts supplied
        texts: usize,
        /// Number of labels supplied
        labels: usize,
    },

    /// Training data cannot produce a model
    #[error("Training error: {0}")]
    Training(String),

    /// A clause has no content left after preprocessing
    #[error("Clause is empty after preprocessing")]
    EmptyClause,

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Model artifact could not be decoded
    #[error("Corrupt model artifact {}: {source}", .path.display())]
    CorruptArtifact {
        /// Artifact path
        path: PathBuf,
        /// Underlying decoding failure
        #[source]
        source: serde_json::Error,
    },

    /// Model artifact decoded but cannot be used
    #[error("Incompatible model artifact {}: {reason}", .path.display())]
    IncompatibleArtifact {
        /// Artifact path
        path: PathBuf,
        /// Why the artifact was rejected
        reason: String,
    },

    /// File or directory does not exist
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Dataset file extension not recognized
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Spreadsheet reading error
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
