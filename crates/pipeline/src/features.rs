//! Feature engineering for candidate scoring.
//!
//! Every movie is encoded as a fixed-length vector:
//! - slots 0..20: one-hot genre membership for genre ids 0 through 19
//! - slot 20: vote average (defaulted when absent)
//! - slot 21: release year (defaulted when absent or unparsable)
//!
//! Genre ids outside 0..20 contribute nothing.

use data_loader::MovieRecord;
use rayon::prelude::*;
use std::ops::Index;

/// Number of one-hot genre slots
pub const GENRE_SLOTS: usize = 20;

/// Position of the vote average
pub const VOTE_AVERAGE_SLOT: usize = GENRE_SLOTS;

/// Position of the release year
pub const RELEASE_YEAR_SLOT: usize = GENRE_SLOTS + 1;

/// Total vector length
pub const FEATURE_LEN: usize = GENRE_SLOTS + 2;

/// Numeric encoding of a movie (or the mean of several movies).
///
/// The length is part of the type, so it is always [`FEATURE_LEN`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_LEN]);

impl FeatureVector {
    pub fn zeros() -> Self {
        Self([0.0; FEATURE_LEN])
    }

    /// Encode a single movie
    pub fn from_movie(movie: &MovieRecord) -> Self {
        let mut values = [0.0; FEATURE_LEN];

        for &genre_id in &movie.genre_ids {
            if let Some(slot) = values[..GENRE_SLOTS].get_mut(genre_id as usize) {
                *slot = 1.0;
            }
        }
        values[VOTE_AVERAGE_SLOT] = movie.vote_average_or_default();
        values[RELEASE_YEAR_SLOT] = f64::from(movie.release_year());

        Self(values)
    }

    /// Element-wise arithmetic mean; `None` for an empty input.
    pub fn mean<'a>(vectors: impl IntoIterator<Item = &'a FeatureVector>) -> Option<Self> {
        let mut sum = [0.0; FEATURE_LEN];
        let mut count = 0usize;

        for vector in vectors {
            for (acc, v) in sum.iter_mut().zip(vector.0.iter()) {
                *acc += v;
            }
            count += 1;
        }

        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Self(sum.map(|total| total / n)))
    }

    pub fn dot(&self, other: &FeatureVector) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<[f64; FEATURE_LEN]> for FeatureVector {
    fn from(values: [f64; FEATURE_LEN]) -> Self {
        Self(values)
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Encode all candidates in parallel.
///
/// Output order matches input order.
pub fn compute_features(candidates: &[MovieRecord]) -> Vec<FeatureVector> {
    candidates.par_iter().map(FeatureVector::from_movie).collect()
}
