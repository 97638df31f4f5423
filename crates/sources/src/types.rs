//! Shared types returned by the sources.

use data_loader::{ListEntry, MovieId, MovieRecord, UserId};
use std::collections::HashSet;

/// Everything we know about a user up front, gathered once per request.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: UserId,

    /// Watched entries in the order the history source returned them
    pub watched: Vec<ListEntry>,

    /// Ids of every watched movie, for O(1) exclusion checks
    pub watched_movies: HashSet<MovieId>,
}

impl UserContext {
    /// A context with an empty history
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            watched: Vec::new(),
            watched_movies: HashSet::new(),
        }
    }

    /// A context built from watched entries
    pub fn with_watched(user_id: impl Into<UserId>, watched: Vec<ListEntry>) -> Self {
        let watched_movies = watched.iter().map(|e| e.movie_id).collect();
        Self {
            user_id: user_id.into(),
            watched,
            watched_movies,
        }
    }

    pub fn has_history(&self) -> bool {
        !self.watched.is_empty()
    }
}

/// Cast members shown on a movie page
pub const TOP_CAST_LEN: usize = 8;

/// One page of a genre listing
#[derive(Debug, Clone, PartialEq)]
pub struct GenrePage {
    pub page: u32,
    pub results: Vec<MovieRecord>,
    pub total_pages: u32,
}

/// What a list toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListToggle {
    Added,
    Removed,
}
