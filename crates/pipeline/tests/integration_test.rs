//! Integration tests for the pipeline.
//!
//! These tests run profile building, filtering and scoring together over
//! the in-memory sources, the way the orchestrator uses them.

use data_loader::{Category, DataIndex, ListEntry, MovieRecord, UserLists};
use pipeline::{
    build_profile_from_catalog, cosine_similarity, score_candidates, FeatureVector, UserProfile,
};
use sources::{user_context::build_user_context, CatalogSource, InMemoryCatalog, InMemoryHistory};
use std::sync::Arc;

fn movie(id: u32, genres: &[u32], vote: f64, date: &str) -> MovieRecord {
    MovieRecord::new(id, format!("Movie {id}"))
        .with_genres(genres.iter().copied())
        .with_vote_average(vote)
        .with_release_date(date)
        .with_poster(format!("/{id}.jpg"))
}

fn create_test_setup() -> (Arc<DataIndex>, InMemoryCatalog, InMemoryHistory) {
    let mut index = DataIndex::new();

    // Watched
    index.insert_movie(movie(1, &[28], 7.0, "2020-05-01"));
    // Candidates
    index.insert_movie(movie(2, &[28], 7.0, "2020-03-01"));
    index.insert_movie(movie(3, &[35], 2.0, "1990-03-01"));
    index.insert_movie(movie(4, &[12, 16], 7.5, "2019-03-01"));

    // Movie 1 shows up in popular too, and 2 repeats across pages
    index.set_category(Category::Popular, vec![3, 1, 2, 4, 2]);
    index.build_secondary_indices();

    let mut lists = UserLists::default();
    lists.watched.push(ListEntry::new(1));
    // Watched entry that has left the catalog
    lists.watched.push(ListEntry::new(999));
    index.insert_user_lists("viewer", lists);

    let index = Arc::new(index);
    let catalog = InMemoryCatalog::new(index.clone());
    let history = InMemoryHistory::from_index(&index);
    (index, catalog, history)
}

#[tokio::test]
async fn test_full_pipeline_ranks_and_filters() {
    let (_index, catalog, history) = create_test_setup();

    let context = build_user_context(&history, "viewer").await.unwrap();
    let profile = build_profile_from_catalog(&context.watched, &catalog)
        .await
        .expect("movie 1 resolves");

    // The unknown watched movie was skipped
    assert_eq!(profile.sample_count, 1);

    let candidates = catalog.list_popular(1).await.unwrap();
    let ranked = score_candidates(&profile, candidates, &context.watched_movies).unwrap();

    let ids: Vec<u32> = ranked.iter().map(|s| s.movie.id).collect();
    assert!(!ids.contains(&1), "watched movie must be excluded");
    assert_eq!(ids.iter().filter(|&&id| id == 2).count(), 1, "duplicates collapse");
    assert_eq!(ids.len(), 3);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn test_identical_taste_scores_one() {
    let (_index, catalog, _history) = create_test_setup();

    let watched = catalog.get_movie_details(1).await.unwrap();
    let profile = UserProfile::from_movies([&watched]).unwrap();

    // Profile of a single movie is that movie's own vector
    assert_eq!(profile.vector, FeatureVector::from_movie(&watched));

    let a = MovieRecord::new(50, "A")
        .with_genres([28])
        .with_vote_average(7.0)
        .with_release_date("2020-01-01")
        .with_poster("/a.jpg");
    let b = MovieRecord::new(51, "B")
        .with_genres([35])
        .with_vote_average(2.0)
        .with_release_date("1990-01-01")
        .with_poster("/b.jpg");

    let sim_a = cosine_similarity(&profile.vector, &FeatureVector::from_movie(&a));
    let sim_b = cosine_similarity(&profile.vector, &FeatureVector::from_movie(&b));
    assert!((sim_a - 1.0).abs() < 1e-12);
    assert!(sim_a > sim_b);

    let ranked = score_candidates(&profile, vec![a, b], &Default::default()).unwrap();
    let ids: Vec<u32> = ranked.iter().map(|s| s.movie.id).collect();
    assert_eq!(ids, vec![50, 51]);
}

#[tokio::test]
async fn test_user_without_history_gets_no_profile() {
    let (_index, catalog, history) = create_test_setup();

    let context = build_user_context(&history, "newcomer").await.unwrap();
    assert!(build_profile_from_catalog(&context.watched, &catalog).await.is_none());
}
