//! DataIndex building, validation and query logic.
//!
//! Builds the DataIndex from parsed fixtures:
//! - Primary stores (movies, genres, listings, user lists)
//! - Secondary index (genre -> movies)
//! - Paged and text queries used by the in-memory catalog source

use crate::error::{DataLoadError, Result};
use crate::parser::{self, CatalogFile, UsersFile};
use crate::types::*;
use std::path::Path;

impl DataIndex {
    /// Load the catalog and user lists from a directory.
    ///
    /// Expects `catalog.json` and optionally `users.json`. Both files are
    /// parsed in parallel, then secondary indices are built and the
    /// listings are validated.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let catalog_path = data_dir.join("catalog.json");
        let users_path = data_dir.join("users.json");

        let (catalog, users) = rayon::join(
            || parser::parse_catalog(&catalog_path),
            || parser::parse_users(&users_path),
        );

        Self::from_parts(catalog?, users?)
    }

    /// Build a validated index from already-parsed fixtures
    pub fn from_parts(catalog: CatalogFile, users: UsersFile) -> Result<Self> {
        let mut index = DataIndex::new();

        for genre in catalog.genres {
            index.insert_genre(genre);
        }
        for movie in catalog.movies {
            index.insert_movie(movie);
        }
        for (category, ids) in catalog.categories {
            index.set_category(category, ids);
        }
        for (movie_id, cast) in catalog.credits {
            index.insert_credits(movie_id, cast);
        }
        for (user_id, document) in users {
            if let Some(profile) = document.profile {
                index.insert_account_profile(user_id.clone(), profile);
            }
            index.insert_user_lists(user_id, document.lists);
        }

        index.build_secondary_indices();
        index.validate()?;

        Ok(index)
    }

    /// Rebuild the genre index from the movie store.
    ///
    /// Movies are visited in ascending id order so genre pages are stable.
    pub fn build_secondary_indices(&mut self) {
        self.genre_index.clear();
        for movie_id in self.get_all_movie_ids() {
            let Some(movie) = self.movies.get(&movie_id) else {
                continue;
            };
            for &genre_id in &movie.genre_ids {
                let ids = self.genre_index.entry(genre_id).or_default();
                if !ids.contains(&movie_id) {
                    ids.push(movie_id);
                }
            }
        }
    }

    /// Validate data integrity.
    ///
    /// Every id in a curated listing or the credits must exist in the movie
    /// store. User lists are not checked: a saved movie may have left the catalog.
    pub fn validate(&self) -> Result<()> {
        for movie_id in self.credits.keys() {
            if !self.movies.contains_key(movie_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie in credits".to_string(),
                    id: *movie_id,
                });
            }
        }

        for (category, ids) in &self.categories {
            for id in ids {
                if !self.movies.contains_key(id) {
                    return Err(DataLoadError::MissingReference {
                        entity: format!("Movie in {category}"),
                        id: *id,
                    });
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        for genre in &self.genres {
            if !seen.insert(genre.id) {
                return Err(DataLoadError::ValidationError(format!(
                    "duplicate genre id {}",
                    genre.id
                )));
            }
        }
        Ok(())
    }

    /// One page (1-indexed) of a curated listing, in listing order.
    ///
    /// Page 0 and pages past the end are empty.
    pub fn category_page(&self, category: Category, page: u32) -> Vec<&MovieRecord> {
        page_slice(self.get_category(category), page)
            .iter()
            .filter_map(|id| self.get_movie(*id))
            .collect()
    }

    /// One page (1-indexed) of a genre's movies plus the total page count
    pub fn genre_page(&self, genre_id: GenreId, page: u32) -> (Vec<&MovieRecord>, u32) {
        let ids = self.get_movies_by_genre(genre_id);
        let movies = page_slice(ids, page)
            .iter()
            .filter_map(|id| self.get_movie(*id))
            .collect();
        (movies, total_pages(ids.len()))
    }

    /// Case-insensitive title search.
    ///
    /// Exact title matches come first, then substring matches; within each
    /// group higher vote averages rank first.
    pub fn search_by_title(&self, query: &str) -> Vec<&MovieRecord> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(u8, &MovieRecord)> = self
            .get_all_movie_ids()
            .into_iter()
            .filter_map(|id| self.get_movie(id))
            .filter_map(|movie| {
                let title = movie.title.to_lowercase();
                if title == query {
                    Some((0, movie))
                } else if title.contains(&query) {
                    Some((1, movie))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| {
            a.0.cmp(&b.0).then_with(|| {
                b.1.vote_average_or_default()
                    .partial_cmp(&a.1.vote_average_or_default())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        matches.into_iter().map(|(_, movie)| movie).collect()
    }
}

fn page_slice(ids: &[MovieId], page: u32) -> &[MovieId] {
    if page == 0 {
        return &[];
    }
    let start = (page as usize - 1).saturating_mul(PAGE_SIZE);
    if start >= ids.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(ids.len());
    &ids[start..end]
}

fn total_pages(len: usize) -> u32 {
    len.div_ceil(PAGE_SIZE) as u32
}
