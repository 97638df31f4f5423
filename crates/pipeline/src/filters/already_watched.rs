//! Filter to remove movies the user has already watched.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{MovieId, MovieRecord};
use std::collections::HashSet;

/// Removes candidates whose id is in the excluded set.
pub struct AlreadyWatchedFilter;

impl Filter for AlreadyWatchedFilter {
    fn name(&self) -> &str {
        "AlreadyWatchedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<MovieRecord>,
        excluded: &HashSet<MovieId>,
    ) -> Result<Vec<MovieRecord>> {
        let filtered: Vec<MovieRecord> = candidates
            .into_iter()
            .filter(|candidate| !excluded.contains(&candidate.id))
            .collect();
        Ok(filtered)
    }
}
