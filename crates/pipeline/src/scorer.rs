//! Candidate ranking against a user profile.
//!
//! ## Algorithm
//! 1. Run the filter pipeline (poster, exclusion, first-wins dedup)
//! 2. Encode survivors and score each by cosine similarity to the profile
//! 3. Stable sort by score, highest first; ties keep input order
//! 4. Keep the top `limit`

use crate::features::compute_features;
use crate::filter_pipeline::FilterPipeline;
use crate::profile::UserProfile;
use crate::similarity::cosine_similarity;
use anyhow::Result;
use data_loader::{MovieId, MovieRecord};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Number of recommendations returned by default
pub const DEFAULT_LIMIT: usize = 20;

/// A candidate paired with its similarity to the user profile
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub movie: MovieRecord,
    /// Cosine similarity in [-1, 1]
    pub score: f64,
}

/// Filters, scores and ranks candidates.
///
/// Holds no per-user state, so one instance can serve concurrent requests.
pub struct CandidateScorer {
    filter_pipeline: FilterPipeline,
    limit: usize,
}

impl CandidateScorer {
    /// Scorer with the default filters and a limit of [`DEFAULT_LIMIT`]
    pub fn new() -> Self {
        Self {
            filter_pipeline: FilterPipeline::recommendation_defaults(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Configure the maximum number of results (default: 20)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Replace the filter pipeline
    pub fn with_pipeline(mut self, filter_pipeline: FilterPipeline) -> Self {
        self.filter_pipeline = filter_pipeline;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Rank `candidates` against `profile`, never returning an id in `excluded`.
    pub fn score_candidates(
        &self,
        profile: &UserProfile,
        candidates: Vec<MovieRecord>,
        excluded: &HashSet<MovieId>,
    ) -> Result<Vec<ScoredCandidate>> {
        let input_count = candidates.len();
        let survivors = self.filter_pipeline.apply(candidates, excluded)?;

        let scores: Vec<f64> = compute_features(&survivors)
            .par_iter()
            .map(|features| cosine_similarity(&profile.vector, features))
            .collect();

        let mut scored: Vec<ScoredCandidate> = survivors
            .into_iter()
            .zip(scores)
            .map(|(movie, score)| ScoredCandidate { movie, score })
            .collect();

        // `sort_by` is stable
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.limit);

        debug!(
            "Scored candidates: input={}, ranked={}",
            input_count,
            scored.len()
        );
        Ok(scored)
    }
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rank candidates with the default scorer
pub fn score_candidates(
    profile: &UserProfile,
    candidates: Vec<MovieRecord>,
    excluded: &HashSet<MovieId>,
) -> Result<Vec<ScoredCandidate>> {
    CandidateScorer::new().score_candidates(profile, candidates, excluded)
}
