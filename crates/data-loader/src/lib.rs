//! # Data Loader Crate
//!
//! This crate holds the catalog domain types and loads the catalog and
//! per-user list fixtures into an in-memory index.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, ListEntry, UserLists, DataIndex)
//! - **parser**: Parse the JSON fixture files into Rust structs
//! - **index**: Build indices, validate, and answer paged/text queries
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Category, DataIndex};
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/sample"))?;
//!
//! let popular = index.category_page(Category::Popular, 1);
//! let movie = index.get_movie(550).unwrap();
//! println!("{} scored {}", movie.title, movie.vote_average_or_default());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::{CatalogFile, UserDocument, UsersFile};
pub use types::{
    // Type aliases
    GenreId,
    MovieId,
    UserId,
    WatchedEntry,
    // Core types
    AccountProfile,
    CastMember,
    Category,
    DataIndex,
    Genre,
    ListEntry,
    ListKind,
    MovieRecord,
    UserLists,
    // Constants
    ANONYMOUS_NAME,
    DEFAULT_RELEASE_YEAR,
    DEFAULT_VOTE_AVERAGE,
    PAGE_SIZE,
    // Helpers
    parse_release_year,
};
