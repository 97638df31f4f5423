//! Source traits for the catalog and the per-user store (lists and account
//! profile).
//!
//! Both are treated as stateless query interfaces by the recommendation
//! path. Implementations must be `Send + Sync` so one instance can be shared
//! behind an `Arc` by concurrent requests.

use crate::error::Result;
use crate::types::{GenrePage, ListToggle, TOP_CAST_LEN};
use async_trait::async_trait;
use data_loader::{
    AccountProfile, CastMember, Category, Genre, GenreId, ListEntry, ListKind, MovieId, MovieRecord, WatchedEntry,
};

/// Read access to the movie catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Full detail record for one movie.
    ///
    /// Fails with `NotFound` if the id is unknown.
    async fn get_movie_details(&self, id: MovieId) -> Result<MovieRecord>;

    /// Billed cast of a movie, in billing order.
    ///
    /// Fails with `NotFound` if the id is unknown.
    async fn get_movie_credits(&self, id: MovieId) -> Result<Vec<CastMember>>;

    /// The first [`TOP_CAST_LEN`] billed cast members
    async fn top_cast(&self, id: MovieId) -> Result<Vec<CastMember>> {
        let mut cast = self.get_movie_credits(id).await?;
        cast.truncate(TOP_CAST_LEN);
        Ok(cast)
    }

    /// One page (1-indexed) of a curated listing, in API order
    async fn list_category(&self, category: Category, page: u32) -> Result<Vec<MovieRecord>>;

    /// One page (1-indexed) of popular movies
    async fn list_popular(&self, page: u32) -> Result<Vec<MovieRecord>> {
        self.list_category(Category::Popular, page).await
    }

    /// Title search
    async fn search(&self, query: &str) -> Result<Vec<MovieRecord>>;

    /// One page (1-indexed) of movies in a genre
    async fn list_by_genre(&self, genre_id: GenreId, page: u32) -> Result<GenrePage>;

    /// The genre taxonomy
    async fn genres(&self) -> Result<Vec<Genre>>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Per-user personal lists
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Entries of one list, in the order they were added
    async fn list(&self, user_id: &str, kind: ListKind) -> Result<Vec<ListEntry>>;

    /// Movies the user has marked watched
    async fn list_watched(&self, user_id: &str) -> Result<Vec<WatchedEntry>> {
        self.list(user_id, ListKind::Watched).await
    }

    /// Whether a movie is in one of the user's lists
    async fn contains(&self, user_id: &str, kind: ListKind, movie_id: MovieId) -> Result<bool> {
        let entries = self.list(user_id, kind).await?;
        Ok(entries.iter().any(|e| e.movie_id == movie_id))
    }

    /// Add the entry if its movie is absent from the list, remove it otherwise
    async fn toggle(&self, user_id: &str, kind: ListKind, entry: ListEntry) -> Result<ListToggle>;

    /// The user's account profile; `None` if they never saved one
    async fn get_profile(&self, user_id: &str) -> Result<Option<AccountProfile>>;

    /// Replace the user's account profile
    async fn update_profile(&self, user_id: &str, profile: AccountProfile) -> Result<()>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}
