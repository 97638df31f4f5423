//! In-memory catalog backed by a loaded DataIndex.

use crate::error::{Result, SourceError};
use crate::traits::CatalogSource;
use crate::types::GenrePage;
use async_trait::async_trait;
use data_loader::{CastMember, Category, DataIndex, Genre, GenreId, MovieId, MovieRecord};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Catalog source that answers from a shared, read-only DataIndex
#[derive(Clone)]
pub struct InMemoryCatalog {
    data_index: Arc<DataIndex>,
}

impl InMemoryCatalog {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    #[instrument(skip(self))]
    async fn get_movie_details(&self, id: MovieId) -> Result<MovieRecord> {
        self.data_index
            .get_movie(id)
            .cloned()
            .ok_or(SourceError::NotFound(id))
    }

    #[instrument(skip(self))]
    async fn get_movie_credits(&self, id: MovieId) -> Result<Vec<CastMember>> {
        if self.data_index.get_movie(id).is_none() {
            return Err(SourceError::NotFound(id));
        }
        Ok(self.data_index.get_credits(id).to_vec())
    }

    #[instrument(skip(self))]
    async fn list_category(&self, category: Category, page: u32) -> Result<Vec<MovieRecord>> {
        let movies: Vec<MovieRecord> = self
            .data_index
            .category_page(category, page)
            .into_iter()
            .cloned()
            .collect();
        debug!("{} page {} returned {} movies", category, page, movies.len());
        Ok(movies)
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieRecord>> {
        Ok(self
            .data_index
            .search_by_title(query)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn list_by_genre(&self, genre_id: GenreId, page: u32) -> Result<GenrePage> {
        let (movies, total_pages) = self.data_index.genre_page(genre_id, page);
        Ok(GenrePage {
            page,
            results: movies.into_iter().cloned().collect(),
            total_pages,
        })
    }

    async fn genres(&self) -> Result<Vec<Genre>> {
        Ok(self.data_index.genres().to_vec())
    }

    fn name(&self) -> &'static str {
        "InMemoryCatalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_catalog() -> InMemoryCatalog {
        let mut index = DataIndex::new();
        for id in 1..=25 {
            index.insert_movie(
                MovieRecord::new(id, format!("Movie {id}"))
                    .with_genres([18])
                    .with_poster(format!("/{id}.jpg")),
            );
        }
        index.set_category(Category::Popular, (1..=25).collect());
        index.insert_genre(Genre { id: 18, name: "Drama".into() });
        index.insert_credits(
            1,
            (0..12)
                .rev()
                .map(|order| CastMember::new(format!("Actor {order}"), order))
                .collect(),
        );
        index.build_secondary_indices();

        InMemoryCatalog::new(Arc::new(index))
    }

    #[tokio::test]
    async fn test_details_and_not_found() {
        let catalog = create_test_catalog();

        let movie = catalog.get_movie_details(7).await.unwrap();
        assert_eq!(movie.title, "Movie 7");

        let err = catalog.get_movie_details(700).await.unwrap_err();
        assert_eq!(err, SourceError::NotFound(700));
    }

    #[tokio::test]
    async fn test_popular_pages() {
        let catalog = create_test_catalog();

        let first = catalog.list_popular(1).await.unwrap();
        let second = catalog.list_popular(2).await.unwrap();
        let third = catalog.list_popular(3).await.unwrap();

        assert_eq!(first.len(), 20);
        assert_eq!(first[0].id, 1);
        assert_eq!(second.len(), 5);
        assert!(third.is_empty());
    }

    #[tokio::test]
    async fn test_genre_page_and_search() {
        let catalog = create_test_catalog();

        let page = catalog.list_by_genre(18, 2).await.unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.results.len(), 5);

        let hits = catalog.search("movie 2").await.unwrap();
        assert!(hits.iter().all(|m| m.title.starts_with("Movie 2")));
        assert_eq!(hits.len(), 7);

        assert_eq!(catalog.genres().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_credits_in_billing_order() {
        let catalog = create_test_catalog();

        let cast = catalog.get_movie_credits(1).await.unwrap();
        assert_eq!(cast.len(), 12);
        assert_eq!(cast[0].name, "Actor 0");

        let top: Vec<String> = catalog
            .top_cast(1)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        let expected: Vec<String> = (0..8).map(|order| format!("Actor {order}")).collect();
        assert_eq!(top, expected);
    }

    #[tokio::test]
    async fn test_credits_unknown_movie() {
        let catalog = create_test_catalog();

        // Known movie without credits
        assert!(catalog.top_cast(2).await.unwrap().is_empty());

        assert_eq!(
            catalog.get_movie_credits(700).await.unwrap_err(),
            SourceError::NotFound(700)
        );
        assert_eq!(catalog.top_cast(700).await.unwrap_err(), SourceError::NotFound(700));
    }
}
