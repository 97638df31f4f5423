//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::filters::{AlreadyWatchedFilter, DuplicateFilter, MissingPosterFilter};
use crate::traits::Filter;
use anyhow::Result;
use data_loader::{MovieId, MovieRecord};
use std::collections::HashSet;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(MissingPosterFilter)
///     .add_filter(AlreadyWatchedFilter)
///     .add_filter(DuplicateFilter);
///
/// let filtered = pipeline.apply(candidates, &watched_ids)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Poster check, watched exclusion, then first-wins deduplication.
    pub fn recommendation_defaults() -> Self {
        Self::new()
            .add_filter(MissingPosterFilter)
            .add_filter(AlreadyWatchedFilter)
            .add_filter(DuplicateFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the configured filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// # Returns
    /// * `Ok(Vec<MovieRecord>)` - The candidates left after all filters
    /// * `Err` - If any filter fails
    pub fn apply(
        &self,
        candidates: Vec<MovieRecord>,
        excluded: &HashSet<MovieId>,
    ) -> Result<Vec<MovieRecord>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, excluded)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
