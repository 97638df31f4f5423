//! Filter to drop movies that cannot be displayed.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{MovieId, MovieRecord};
use std::collections::HashSet;

/// Removes candidates without a usable poster path.
pub struct MissingPosterFilter;

impl Filter for MissingPosterFilter {
    fn name(&self) -> &str {
        "MissingPosterFilter"
    }

    fn apply(
        &self,
        candidates: Vec<MovieRecord>,
        _excluded: &HashSet<MovieId>,
    ) -> Result<Vec<MovieRecord>> {
        Ok(candidates.into_iter().filter(MovieRecord::has_poster).collect())
    }
}
