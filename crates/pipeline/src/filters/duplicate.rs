//! Filter to collapse repeated candidates.
//!
//! Candidates gathered from several listing pages can repeat; only the
//! first occurrence of each id is kept.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{MovieId, MovieRecord};
use std::collections::HashSet;

pub struct DuplicateFilter;

impl Filter for DuplicateFilter {
    fn name(&self) -> &str {
        "DuplicateFilter"
    }

    fn apply(
        &self,
        candidates: Vec<MovieRecord>,
        _excluded: &HashSet<MovieId>,
    ) -> Result<Vec<MovieRecord>> {
        let mut seen = HashSet::with_capacity(candidates.len());
        let filtered: Vec<MovieRecord> = candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.id))
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let candidates = vec![
            MovieRecord::new(1, "first"),
            MovieRecord::new(2, "two"),
            MovieRecord::new(1, "second"),
            MovieRecord::new(3, "three"),
            MovieRecord::new(2, "again"),
        ];

        let filtered = DuplicateFilter.apply(candidates, &HashSet::new()).unwrap();

        let ids: Vec<MovieId> = filtered.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(filtered[0].title, "first");
        assert_eq!(filtered[1].title, "two");
    }
}
