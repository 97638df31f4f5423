//! User taste profile built from watch history.

use crate::features::FeatureVector;
use data_loader::{MovieId, MovieRecord, WatchedEntry};
use futures::future::join_all;
use sources::{CatalogSource, SourceError};
use std::future::Future;
use tracing::{debug, warn};

/// Mean feature vector of the movies a user has watched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserProfile {
    pub vector: FeatureVector,
    /// How many resolved movies went into the mean
    pub sample_count: usize,
}

impl UserProfile {
    /// Profile from already-resolved movies; `None` when there are none.
    pub fn from_movies<'a>(movies: impl IntoIterator<Item = &'a MovieRecord>) -> Option<Self> {
        let vectors: Vec<FeatureVector> = movies.into_iter().map(FeatureVector::from_movie).collect();
        let vector = FeatureVector::mean(&vectors)?;
        Some(Self {
            vector,
            sample_count: vectors.len(),
        })
    }
}

/// Resolve every watched entry and average the resulting vectors.
///
/// Resolutions run concurrently; results are joined in input order before
/// the reduction. Entries that fail to resolve are skipped. Returns `None`
/// when the list is empty or nothing resolves, meaning "cannot personalize".
pub async fn build_profile<F, Fut>(entries: &[WatchedEntry], resolve: F) -> Option<UserProfile>
where
    F: Fn(MovieId) -> Fut,
    Fut: Future<Output = Result<MovieRecord, SourceError>>,
{
    if entries.is_empty() {
        return None;
    }

    let results = join_all(entries.iter().map(|entry| resolve(entry.movie_id))).await;

    let mut movies = Vec::with_capacity(results.len());
    for (entry, result) in entries.iter().zip(results) {
        match result {
            Ok(movie) => movies.push(movie),
            Err(SourceError::NotFound(id)) => {
                debug!("Skipping watched movie {}: not in catalog", id);
            }
            Err(e) => {
                warn!("Skipping watched movie {}: {}", entry.movie_id, e);
            }
        }
    }

    debug!("Resolved {} of {} watched movies", movies.len(), entries.len());
    UserProfile::from_movies(&movies)
}

/// [`build_profile`] resolving through a catalog's detail endpoint
pub async fn build_profile_from_catalog(
    entries: &[WatchedEntry],
    catalog: &dyn CatalogSource,
) -> Option<UserProfile> {
    build_profile(entries, |id| catalog.get_movie_details(id)).await
}
