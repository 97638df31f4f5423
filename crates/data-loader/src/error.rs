//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading and validating catalog fixtures
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File contents were not valid JSON for the expected shape
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// Referenced entity doesn't exist (e.g., a category listing an unknown movie)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u32 },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
