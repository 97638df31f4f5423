//! Core domain types for the movie catalog and per-user lists.
//!
//! These mirror the shapes the catalog API and the user document store
//! return, with explicit defaulting for the fields the scorer depends on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases & Constants
// =============================================================================

/// Unique catalog identifier for a movie
pub type MovieId = u32;

/// Genre identifier from the catalog's genre taxonomy
pub type GenreId = u32;

/// Opaque identifier of a user in the document store
pub type UserId = String;

/// Number of results the catalog returns per page
pub const PAGE_SIZE: usize = 20;

/// Vote average assumed when the catalog omits one
pub const DEFAULT_VOTE_AVERAGE: f64 = 5.0;

/// Release year assumed when the release date is missing or unparsable
pub const DEFAULT_RELEASE_YEAR: i32 = 2000;

// =============================================================================
// Movie-related Types
// =============================================================================

/// A catalog entry.
///
/// Deserializes from both the list shape (`genre_ids: [28, 12]`) and the
/// detail shape (`genres: [{"id": 28, "name": "Action"}]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMovieRecord")]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub genre_ids: Vec<GenreId>,
    pub vote_average: Option<f64>,
    /// `YYYY-MM-DD` as delivered by the catalog
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
}

impl MovieRecord {
    /// Create a record with only an id and a title; everything else absent.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            genre_ids: Vec::new(),
            vote_average: None,
            release_date: None,
            poster_path: None,
            overview: None,
        }
    }

    pub fn with_genres(mut self, genre_ids: impl IntoIterator<Item = GenreId>) -> Self {
        self.genre_ids = genre_ids.into_iter().collect();
        self
    }

    pub fn with_vote_average(mut self, vote_average: f64) -> Self {
        self.vote_average = Some(vote_average);
        self
    }

    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = Some(release_date.into());
        self
    }

    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    /// Vote average, or [`DEFAULT_VOTE_AVERAGE`] when absent or not finite.
    pub fn vote_average_or_default(&self) -> f64 {
        self.vote_average
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_VOTE_AVERAGE)
    }

    /// Release year, or [`DEFAULT_RELEASE_YEAR`] when the date is absent or unparsable.
    pub fn release_year(&self) -> i32 {
        self.release_date
            .as_deref()
            .and_then(parse_release_year)
            .unwrap_or(DEFAULT_RELEASE_YEAR)
    }

    /// True when the poster path is present and non-empty.
    pub fn has_poster(&self) -> bool {
        self.poster_path
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }
}

/// Extract the year from a `YYYY-MM-DD` style date.
pub fn parse_release_year(date: &str) -> Option<i32> {
    date.trim().get(..4)?.parse().ok()
}

/// Wire shape accepted for [`MovieRecord`].
#[derive(Debug, Deserialize)]
struct RawMovieRecord {
    id: MovieId,
    #[serde(default, alias = "name")]
    title: String,
    #[serde(default)]
    genre_ids: Option<Vec<GenreId>>,
    #[serde(default)]
    genres: Option<Vec<Genre>>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    overview: Option<String>,
}

impl From<RawMovieRecord> for MovieRecord {
    fn from(raw: RawMovieRecord) -> Self {
        let genre_ids = match (raw.genre_ids, raw.genres) {
            (Some(ids), _) => ids,
            (None, Some(genres)) => genres.into_iter().map(|g| g.id).collect(),
            (None, None) => Vec::new(),
        };

        Self {
            id: raw.id,
            title: raw.title,
            genre_ids,
            vote_average: raw.vote_average,
            release_date: raw.release_date,
            poster_path: raw.poster_path,
            overview: raw.overview,
        }
    }
}

/// A genre from the catalog's taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    #[serde(default)]
    pub name: String,
}

/// Curated catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Popular,
    TopRated,
    Upcoming,
    NowPlaying,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Popular,
        Category::TopRated,
        Category::Upcoming,
        Category::NowPlaying,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::TopRated => "top_rated",
            Category::Upcoming => "upcoming",
            Category::NowPlaying => "now_playing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

// =============================================================================
// Per-user Lists
// =============================================================================

/// The personal lists a user can keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Favorites,
    Watched,
    WatchLater,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Favorites, ListKind::Watched, ListKind::WatchLater];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Favorites => "favorites",
            ListKind::Watched => "watched",
            ListKind::WatchLater => "watch_later",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "favorites" | "favourites" => Ok(ListKind::Favorites),
            "watched" => Ok(ListKind::Watched),
            "watch_later" | "watchlater" => Ok(ListKind::WatchLater),
            _ => Err(format!("unknown list: {s}")),
        }
    }
}

/// One movie saved to a user's list.
///
/// Only `movie_id` matters for recommendations; the rest is display data
/// captured when the movie was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    #[serde(alias = "id")]
    pub movie_id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "poster")]
    pub poster_path: Option<String>,
}

/// A movie the user marked as watched
pub type WatchedEntry = ListEntry;

impl ListEntry {
    pub fn new(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            title: None,
            poster_path: None,
        }
    }

    pub fn from_movie(movie: &MovieRecord) -> Self {
        Self {
            movie_id: movie.id,
            title: Some(movie.title.clone()),
            poster_path: movie.poster_path.clone(),
        }
    }
}

/// All lists belonging to one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserLists {
    #[serde(default)]
    pub favorites: Vec<ListEntry>,
    #[serde(default)]
    pub watched: Vec<ListEntry>,
    #[serde(default)]
    pub watch_later: Vec<ListEntry>,
}

impl UserLists {
    pub fn get(&self, kind: ListKind) -> &[ListEntry] {
        match kind {
            ListKind::Favorites => &self.favorites,
            ListKind::Watched => &self.watched,
            ListKind::WatchLater => &self.watch_later,
        }
    }

    pub fn get_mut(&mut self, kind: ListKind) -> &mut Vec<ListEntry> {
        match kind {
            ListKind::Favorites => &mut self.favorites,
            ListKind::Watched => &mut self.watched,
            ListKind::WatchLater => &mut self.watch_later,
        }
    }
}

// =============================================================================
// Credits and Accounts
// =============================================================================

/// One billed cast member of a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    /// Billing position, 0 first
    #[serde(default)]
    pub order: u32,
}

impl CastMember {
    pub fn new(name: impl Into<String>, order: u32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            character: None,
            order,
        }
    }
}

/// Name shown for authors without a display name
pub const ANONYMOUS_NAME: &str = "anon";

/// Public account details a user can edit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default, alias = "photoURL")]
    pub photo_url: Option<String>,
}

impl AccountProfile {
    /// Blank strings are stored as absent
    pub fn new(display_name: Option<String>, photo_url: Option<String>) -> Self {
        Self {
            display_name: non_blank(display_name),
            photo_url: non_blank(photo_url),
        }
    }

    /// The display name, or [`ANONYMOUS_NAME`] when none is set
    pub fn display_name_or_anon(&self) -> &str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS_NAME)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// DataIndex - The In-Memory Catalog
// =============================================================================

/// Holds the catalog, its curated listings and the per-user lists,
/// with secondary indices for genre browsing.
#[derive(Debug)]
pub struct DataIndex {
    // Primary data stores
    pub(crate) movies: HashMap<MovieId, MovieRecord>,
    pub(crate) genres: Vec<Genre>,
    pub(crate) user_lists: HashMap<UserId, UserLists>,
    pub(crate) account_profiles: HashMap<UserId, AccountProfile>,
    /// Billed cast per movie, in billing order
    pub(crate) credits: HashMap<MovieId, Vec<CastMember>>,

    /// Ordered movie ids per curated listing, in API order
    pub(crate) categories: HashMap<Category, Vec<MovieId>>,

    // Secondary indices
    /// Movies grouped by genre id, ascending by movie id
    pub(crate) genre_index: HashMap<GenreId, Vec<MovieId>>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self {
            movies: HashMap::new(),
            genres: Vec::new(),
            user_lists: HashMap::new(),
            account_profiles: HashMap::new(),
            credits: HashMap::new(),
            categories: HashMap::new(),
            genre_index: HashMap::new(),
        }
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&MovieRecord> {
        self.movies.get(&id)
    }

    /// All movie ids, ascending
    pub fn get_all_movie_ids(&self) -> Vec<MovieId> {
        let mut ids: Vec<MovieId> = self.movies.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Ordered ids in a curated listing; empty if the listing is unknown
    pub fn get_category(&self, category: Category) -> &[MovieId] {
        self.categories
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All movies in a specific genre
    pub fn get_movies_by_genre(&self, genre_id: GenreId) -> &[MovieId] {
        self.genre_index
            .get(&genre_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The genre taxonomy as delivered by the catalog
    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    /// A user's lists, if the user has any
    pub fn get_user_lists(&self, user_id: &str) -> Option<&UserLists> {
        self.user_lists.get(user_id)
    }

    /// A user's account profile, if one was ever saved
    pub fn get_account_profile(&self, user_id: &str) -> Option<&AccountProfile> {
        self.account_profiles.get(user_id)
    }

    /// Billed cast of a movie; empty when no credits are loaded
    pub fn get_credits(&self, movie_id: MovieId) -> &[CastMember] {
        self.credits
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All known user ids, sorted
    pub fn user_ids(&self) -> Vec<&UserId> {
        let mut ids: Vec<&UserId> = self.user_lists.keys().collect();
        ids.sort();
        ids
    }

    /// Insert a movie into the index
    pub fn insert_movie(&mut self, movie: MovieRecord) {
        self.movies.insert(movie.id, movie);
    }

    /// Add a genre to the taxonomy
    pub fn insert_genre(&mut self, genre: Genre) {
        self.genres.push(genre);
    }

    /// Replace the ordered contents of a curated listing
    pub fn set_category(&mut self, category: Category, movie_ids: Vec<MovieId>) {
        self.categories.insert(category, movie_ids);
    }

    /// Store a user's lists
    pub fn insert_user_lists(&mut self, user_id: impl Into<UserId>, lists: UserLists) {
        self.user_lists.insert(user_id.into(), lists);
    }

    /// Store a user's account profile
    pub fn insert_account_profile(&mut self, user_id: impl Into<UserId>, profile: AccountProfile) {
        self.account_profiles.insert(user_id.into(), profile);
    }

    /// Store a movie's cast, sorted into billing order
    pub fn insert_credits(&mut self, movie_id: MovieId, mut cast: Vec<CastMember>) {
        cast.sort_by_key(|member| member.order);
        self.credits.insert(movie_id, cast);
    }

    /// Get counts for debugging/validation: (movies, genres, users)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.movies.len(), self.genres.len(), self.user_lists.len())
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_shape_deserializes() {
        let movie: MovieRecord = serde_json::from_str(
            r#"{"id": 550, "title": "Fight Club", "genre_ids": [18, 53],
                "vote_average": 8.4, "release_date": "1999-10-15",
                "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"}"#,
        )
        .unwrap();

        assert_eq!(movie.id, 550);
        assert_eq!(movie.genre_ids, vec![18, 53]);
        assert_eq!(movie.release_year(), 1999);
        assert_eq!(movie.vote_average_or_default(), 8.4);
        assert!(movie.has_poster());
    }

    #[test]
    fn test_detail_shape_deserializes() {
        let movie: MovieRecord = serde_json::from_str(
            r#"{"id": 13, "title": "Forrest Gump",
                "genres": [{"id": 35, "name": "Comedy"}, {"id": 18, "name": "Drama"}]}"#,
        )
        .unwrap();

        assert_eq!(movie.genre_ids, vec![35, 18]);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let movie: MovieRecord = serde_json::from_str(r#"{"id": 1}"#).unwrap();

        assert_eq!(movie.vote_average_or_default(), DEFAULT_VOTE_AVERAGE);
        assert_eq!(movie.release_year(), DEFAULT_RELEASE_YEAR);
        assert!(movie.genre_ids.is_empty());
        assert!(!movie.has_poster());
    }

    #[test]
    fn test_unparsable_release_date() {
        let movie = MovieRecord::new(1, "x").with_release_date("soon");
        assert_eq!(movie.release_year(), DEFAULT_RELEASE_YEAR);

        let movie = MovieRecord::new(1, "x").with_release_date("");
        assert_eq!(movie.release_year(), DEFAULT_RELEASE_YEAR);
    }

    #[test]
    fn test_non_finite_vote_average_is_defaulted() {
        let movie = MovieRecord::new(1, "x").with_vote_average(f64::NAN);
        assert_eq!(movie.vote_average_or_default(), DEFAULT_VOTE_AVERAGE);
    }

    #[test]
    fn test_empty_poster_is_not_usable() {
        let movie = MovieRecord::new(1, "x").with_poster("");
        assert!(!movie.has_poster());
    }

    #[test]
    fn test_list_entry_accepts_document_fields() {
        let entry: ListEntry =
            serde_json::from_str(r#"{"id": 42, "title": "Heat", "poster": "/heat.jpg"}"#).unwrap();

        assert_eq!(entry.movie_id, 42);
        assert_eq!(entry.poster_path.as_deref(), Some("/heat.jpg"));
    }

    #[test]
    fn test_account_profile_accepts_document_fields() {
        let profile: AccountProfile =
            serde_json::from_str(r#"{"displayName": "Ann", "photoURL": "https://img/ann.png"}"#).unwrap();
        assert_eq!(profile.display_name_or_anon(), "Ann");
        assert_eq!(profile.photo_url.as_deref(), Some("https://img/ann.png"));

        let blank = AccountProfile::new(Some("  ".into()), None);
        assert_eq!(blank.display_name, None);
        assert_eq!(blank.display_name_or_anon(), ANONYMOUS_NAME);
        assert_eq!(AccountProfile::default().display_name_or_anon(), "anon");
    }

    #[test]
    fn test_credits_kept_in_billing_order() {
        let mut index = DataIndex::new();
        index.insert_credits(
            7,
            vec![CastMember::new("Third", 2), CastMember::new("First", 0), CastMember::new("Second", 1)],
        );

        let names: Vec<&str> = index.get_credits(7).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        assert!(index.get_credits(8).is_empty());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("top_rated".parse::<Category>().unwrap(), Category::TopRated);
        assert_eq!("now-playing".parse::<Category>().unwrap(), Category::NowPlaying);
        assert!("trending".parse::<Category>().is_err());

        assert_eq!("watch-later".parse::<ListKind>().unwrap(), ListKind::WatchLater);
        assert!("queue".parse::<ListKind>().is_err());
    }
}
