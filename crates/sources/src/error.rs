//! Errors raised by catalog and history sources.

use data_loader::MovieId;
use thiserror::Error;

/// Failure modes of an external data source.
///
/// Callers in the recommendation path recover from both locally; neither
/// is surfaced to the end user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The source is unreachable, refused the request, or is otherwise broken
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// A single movie id could not be resolved
    #[error("Movie not found: {0}")]
    NotFound(MovieId),
}

pub type Result<T> = std::result::Result<T, SourceError>;
