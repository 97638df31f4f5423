//! # Sources Crate
//!
//! Data sources the recommendation engine reads from.
//!
//! ## Components
//!
//! ### CatalogSource
//! Movie details and cast, curated listings (popular, top rated, upcoming, now
//! playing), title search and genre browsing. `InMemoryCatalog` serves all
//! of it from a loaded `DataIndex`.
//!
//! ### HistorySource
//! A user's personal lists (favorites, watched, watch later) with toggle
//! semantics, and their editable account profile. `InMemoryHistory` keeps
//! both in shared maps.
//!
//! ### ReviewBoard
//! Threaded reviews with like/dislike voting. Author names come from the
//! account profiles when threads are read.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CatalogSource, InMemoryCatalog, InMemoryHistory, user_context::build_user_context};
//! use data_loader::DataIndex;
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files("data/sample".as_ref())?);
//! let catalog = InMemoryCatalog::new(data_index.clone());
//! let history = InMemoryHistory::from_index(&data_index);
//!
//! let context = build_user_context(&history, "alice").await?;
//! let popular = catalog.list_popular(1).await?;
//! ```

// Public modules
pub mod catalog;
pub mod error;
pub mod history;
pub mod reviews;
pub mod traits;
pub mod types;
pub mod user_context;

// Re-export commonly used types
pub use catalog::InMemoryCatalog;
pub use error::SourceError;
pub use history::InMemoryHistory;
pub use reviews::{
    NewReview, Review, ReviewAuthor, ReviewBoard, ReviewError, ReviewId, ReviewThread, Vote, VoteOutcome,
};
pub use traits::{CatalogSource, HistorySource};
pub use types::{GenrePage, ListToggle, UserContext, TOP_CAST_LEN};
