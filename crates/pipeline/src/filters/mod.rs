//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_watched;
pub mod duplicate;
pub mod missing_poster;

// Re-export for convenience
pub use already_watched::AlreadyWatchedFilter;
pub use duplicate::DuplicateFilter;
pub use missing_poster::MissingPosterFilter;
