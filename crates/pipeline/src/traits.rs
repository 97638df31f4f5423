//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to candidate sets.

use anyhow::Result;
use data_loader::{MovieId, MovieRecord};
use std::collections::HashSet;

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
/// Filters take ownership of the candidates and must keep the relative
/// order of the ones they let through.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `excluded` - Movie ids that must not be recommended
    fn apply(
        &self,
        candidates: Vec<MovieRecord>,
        excluded: &HashSet<MovieId>,
    ) -> Result<Vec<MovieRecord>>;
}
