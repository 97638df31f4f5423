//! # Recommendation Orchestrator
//!
//! This module coordinates the recommendation pipeline:
//! 1. Fetch the user's watched list
//! 2. Build a taste profile (detail lookups fan out concurrently)
//! 3. Without a profile, fall back to the guest path: popular page 1, unscored
//! 4. Otherwise gather popular pages 1..=3 as candidates
//! 5. Filter, score and rank the candidates
//! 6. Return the top N movies
//!
//! Every source failure is recovered here; callers always get a list.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{info, instrument, warn};

use data_loader::MovieRecord;
use pipeline::{build_profile_from_catalog, CandidateScorer, ScoredCandidate};
use sources::{user_context::build_user_context, CatalogSource, HistorySource, SourceError, UserContext};

use crate::config::RecommendConfig;

/// Which path produced a recommendation list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Ranked by similarity to the user's watch history
    Personalized,
    /// Popular movies in listing order, no personalization
    Guest,
}

/// One recommended movie
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecommendation {
    pub movie: MovieRecord,
    /// Similarity to the user's profile; `None` on the guest path
    pub score: Option<f64>,
}

/// Ranked recommendations and the strategy that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub strategy: Strategy,
    pub items: Vec<MovieRecommendation>,
}

impl Recommendations {
    fn empty(strategy: Strategy) -> Self {
        Self {
            strategy,
            items: Vec::new(),
        }
    }

    /// The movies in ranked order
    pub fn into_movies(self) -> Vec<MovieRecord> {
        self.items.into_iter().map(|item| item.movie).collect()
    }
}

/// Main orchestrator that coordinates the recommendation pipeline.
///
/// Holds only shared handles, so clones are cheap and concurrent requests
/// do not interact.
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    catalog: Arc<dyn CatalogSource>,
    history: Arc<dyn HistorySource>,
    scorer: Arc<CandidateScorer>,
    config: RecommendConfig,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator with the default policy
    pub fn new(catalog: Arc<dyn CatalogSource>, history: Arc<dyn HistorySource>) -> Self {
        Self::with_config(catalog, history, RecommendConfig::default())
    }

    /// Create an orchestrator with a custom policy
    pub fn with_config(
        catalog: Arc<dyn CatalogSource>,
        history: Arc<dyn HistorySource>,
        config: RecommendConfig,
    ) -> Self {
        let scorer = Arc::new(CandidateScorer::new().with_limit(config.limit));
        Self {
            catalog,
            history,
            scorer,
            config,
        }
    }

    /// Replace the candidate scorer, e.g. to run a custom filter pipeline.
    ///
    /// A filter error makes the personalized result empty.
    pub fn with_scorer(mut self, scorer: CandidateScorer) -> Self {
        self.config.limit = scorer.limit();
        self.scorer = Arc::new(scorer);
        self
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogSource> {
        &self.catalog
    }

    pub fn history(&self) -> &Arc<dyn HistorySource> {
        &self.history
    }

    /// Main entry point: ranked movies for a user.
    ///
    /// Scores are dropped; only the order matters to callers.
    pub async fn recommend(&self, user_id: &str) -> Vec<MovieRecord> {
        self.recommend_detailed(user_id).await.into_movies()
    }

    /// Like [`recommend`](Self::recommend), keeping scores and the strategy used
    #[instrument(skip(self))]
    pub async fn recommend_detailed(&self, user_id: &str) -> Recommendations {
        let start_time = Instant::now();

        let context = match build_user_context(self.history.as_ref(), user_id).await {
            Ok(context) => context,
            Err(e) => {
                // Outage and empty history take the same path; the log keeps them apart.
                warn!("History unavailable for user {}, serving guest list: {}", user_id, e);
                UserContext::new(user_id)
            }
        };

        let Some(profile) = build_profile_from_catalog(&context.watched, self.catalog.as_ref()).await
        else {
            info!(
                "No profile for user {} ({} watched entries), serving guest list",
                user_id,
                context.watched.len()
            );
            return self.recommend_guest().await;
        };
        info!(
            "Built profile for user {} from {} movies",
            user_id, profile.sample_count
        );

        let candidates = match self.fetch_popular_pages(self.config.candidate_pages).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Catalog unavailable while gathering candidates: {}", e);
                return Recommendations::empty(Strategy::Personalized);
            }
        };
        info!("Gathered {} candidates", candidates.len());

        let ranked = match self
            .scorer
            .score_candidates(&profile, candidates, &context.watched_movies)
        {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!("Candidate scoring failed: {}", e);
                return Recommendations::empty(Strategy::Personalized);
            }
        };

        info!(
            "Selected {} recommendations for user {} in {:.2?}",
            ranked.len(),
            user_id,
            start_time.elapsed()
        );

        Recommendations {
            strategy: Strategy::Personalized,
            items: ranked.into_iter().map(to_recommendation).collect(),
        }
    }

    /// Non-personalized list: the first popular movies in listing order.
    ///
    /// Nothing is filtered or scored.
    #[instrument(skip(self))]
    pub async fn recommend_guest(&self) -> Recommendations {
        match self.fetch_popular_pages(self.config.guest_pages).await {
            Ok(movies) => Recommendations {
                strategy: Strategy::Guest,
                items: movies
                    .into_iter()
                    .take(self.config.limit)
                    .map(|movie| MovieRecommendation { movie, score: None })
                    .collect(),
            },
            Err(e) => {
                warn!("Catalog unavailable for guest list: {}", e);
                Recommendations::empty(Strategy::Guest)
            }
        }
    }

    /// Fetch popular pages `1..=pages` concurrently, concatenated in page order.
    ///
    /// Any failing page fails the whole fetch so callers never rank a partial set.
    async fn fetch_popular_pages(&self, pages: u32) -> Result<Vec<MovieRecord>, SourceError> {
        let results = join_all((1..=pages).map(|page| self.catalog.list_popular(page))).await;

        let mut movies = Vec::new();
        for result in results {
            movies.extend(result?);
        }
        Ok(movies)
    }
}

fn to_recommendation(scored: ScoredCandidate) -> MovieRecommendation {
    MovieRecommendation {
        movie: scored.movie,
        score: Some(scored.score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use data_loader::{AccountProfile, CastMember, Category, Genre, GenreId, ListEntry, ListKind, MovieId};
    use pipeline::{Filter, FilterPipeline};
    use sources::{GenrePage, InMemoryHistory, ListToggle};
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Catalog with scripted popular pages and failure switches
    #[derive(Default)]
    struct FakeCatalog {
        popular: Vec<Vec<MovieRecord>>,
        details: HashMap<MovieId, MovieRecord>,
        fail_popular: bool,
        fail_details: HashSet<MovieId>,
        requested_pages: Mutex<Vec<u32>>,
    }

    impl FakeCatalog {
        fn requested_pages(&self) -> Vec<u32> {
            let mut pages = self.requested_pages.lock().unwrap().clone();
            pages.sort_unstable();
            pages
        }
    }

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        async fn get_movie_details(&self, id: MovieId) -> sources::error::Result<MovieRecord> {
            if self.fail_details.contains(&id) {
                return Err(SourceError::Unavailable("timeout".into()));
            }
            self.details.get(&id).cloned().ok_or(SourceError::NotFound(id))
        }

        async fn get_movie_credits(&self, id: MovieId) -> sources::error::Result<Vec<CastMember>> {
            self.details
                .get(&id)
                .map(|_| Vec::new())
                .ok_or(SourceError::NotFound(id))
        }

        async fn list_category(
            &self,
            category: Category,
            page: u32,
        ) -> sources::error::Result<Vec<MovieRecord>> {
            assert_eq!(category, Category::Popular);
            self.requested_pages.lock().unwrap().push(page);
            if self.fail_popular {
                return Err(SourceError::Unavailable("503".into()));
            }
            Ok(self
                .popular
                .get(page as usize - 1)
                .cloned()
                .unwrap_or_default())
        }

        async fn search(&self, _query: &str) -> sources::error::Result<Vec<MovieRecord>> {
            Ok(Vec::new())
        }

        async fn list_by_genre(&self, _genre_id: GenreId, page: u32) -> sources::error::Result<GenrePage> {
            Ok(GenrePage {
                page,
                results: Vec::new(),
                total_pages: 0,
            })
        }

        async fn genres(&self) -> sources::error::Result<Vec<Genre>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "FakeCatalog"
        }
    }

    struct BrokenHistory;

    #[async_trait]
    impl HistorySource for BrokenHistory {
        async fn list(&self, _user_id: &str, _kind: ListKind) -> sources::error::Result<Vec<ListEntry>> {
            Err(SourceError::Unavailable("auth expired".into()))
        }

        async fn toggle(
            &self,
            _user_id: &str,
            _kind: ListKind,
            _entry: ListEntry,
        ) -> sources::error::Result<ListToggle> {
            Err(SourceError::Unavailable("auth expired".into()))
        }

        async fn get_profile(&self, _user_id: &str) -> sources::error::Result<Option<AccountProfile>> {
            Err(SourceError::Unavailable("auth expired".into()))
        }

        async fn update_profile(&self, _user_id: &str, _profile: AccountProfile) -> sources::error::Result<()> {
            Err(SourceError::Unavailable("auth expired".into()))
        }

        fn name(&self) -> &'static str {
            "BrokenHistory"
        }
    }

    /// Filter that fails on every candidate set
    struct FailingFilter;

    impl Filter for FailingFilter {
        fn name(&self) -> &str {
            "FailingFilter"
        }

        fn apply(
            &self,
            _candidates: Vec<MovieRecord>,
            _excluded: &HashSet<MovieId>,
        ) -> anyhow::Result<Vec<MovieRecord>> {
            anyhow::bail!("ranking backend offline")
        }
    }

    fn movie(id: MovieId, genres: &[u32], vote: f64, year: i32) -> MovieRecord {
        MovieRecord::new(id, format!("Movie {id}"))
            .with_genres(genres.iter().copied())
            .with_vote_average(vote)
            .with_release_date(format!("{year}-01-01"))
            .with_poster(format!("/{id}.jpg"))
    }

    /// Three pages of 20; page 2 repeats two ids from page 1,
    /// page 1 contains the watched movie and one poster-less movie.
    fn build_catalog() -> FakeCatalog {
        let mut pages: Vec<Vec<MovieRecord>> = (0..3)
            .map(|p| {
                (0..20)
                    .map(|i| {
                        let id = 100 + p * 20 + i;
                        movie(id, &[id % 20], f64::from(id % 10), 1960 + (id % 60) as i32)
                    })
                    .collect()
            })
            .collect();
        pages[0][5] = movie(1, &[2], 7.0, 2020);
        pages[0][6].poster_path = None;
        pages[1][0] = pages[0][0].clone();
        pages[1][1] = pages[0][1].clone();

        let mut details: HashMap<MovieId, MovieRecord> = pages
            .iter()
            .flatten()
            .map(|m| (m.id, m.clone()))
            .collect();
        details.insert(1, movie(1, &[2], 7.0, 2020));
        details.insert(2, movie(2, &[2, 3], 8.0, 2018));

        FakeCatalog {
            popular: pages,
            details,
            ..FakeCatalog::default()
        }
    }

    async fn history_with(watched: &[MovieId]) -> Arc<InMemoryHistory> {
        let history = InMemoryHistory::new();
        for &id in watched {
            history
                .toggle("u1", ListKind::Watched, ListEntry::new(id))
                .await
                .unwrap();
        }
        Arc::new(history)
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[tokio::test]
    async fn test_empty_history_serves_guest_list_in_api_order() {
        let catalog = Arc::new(build_catalog());
        let expected: Vec<MovieId> = catalog.popular[0].iter().map(|m| m.id).collect();
        let orchestrator = RecommendationOrchestrator::new(catalog.clone(), history_with(&[]).await);

        let result = orchestrator.recommend_detailed("u1").await;

        assert_eq!(result.strategy, Strategy::Guest);
        assert!(result.items.iter().all(|item| item.score.is_none()));
        let ids: Vec<MovieId> = result.items.iter().map(|item| item.movie.id).collect();
        // unfiltered: the poster-less movie is still there
        assert_eq!(ids, expected);
        assert_eq!(catalog.requested_pages(), vec![1]);
    }

    #[tokio::test]
    async fn test_guest_list_is_capped() {
        let mut catalog = build_catalog();
        catalog.popular[0].extend((500..510).map(|id| movie(id, &[1], 5.0, 2000)));
        let orchestrator = RecommendationOrchestrator::new(Arc::new(catalog), history_with(&[]).await);

        assert_eq!(orchestrator.recommend("u1").await.len(), 20);
    }

    #[tokio::test]
    async fn test_history_outage_degrades_to_guest() {
        let orchestrator = RecommendationOrchestrator::new(Arc::new(build_catalog()), Arc::new(BrokenHistory));

        let result = orchestrator.recommend_detailed("u1").await;
        assert_eq!(result.strategy, Strategy::Guest);
        assert_eq!(result.items.len(), 20);
    }

    #[tokio::test]
    async fn test_unresolvable_history_degrades_to_guest() {
        let mut catalog = build_catalog();
        catalog.fail_details.insert(2);
        let orchestrator =
            RecommendationOrchestrator::new(Arc::new(catalog), history_with(&[2, 404]).await);

        let result = orchestrator.recommend_detailed("u1").await;
        assert_eq!(result.strategy, Strategy::Guest);
    }

    #[tokio::test]
    async fn test_personalized_uses_three_pages_and_filters() {
        let catalog = Arc::new(build_catalog());
        let orchestrator = RecommendationOrchestrator::new(catalog.clone(), history_with(&[1, 2]).await);

        let result = orchestrator.recommend_detailed("u1").await;

        assert_eq!(result.strategy, Strategy::Personalized);
        assert_eq!(catalog.requested_pages(), vec![1, 2, 3]);
        assert_eq!(result.items.len(), 20);

        let ids: Vec<MovieId> = result.items.iter().map(|item| item.movie.id).collect();
        let unique: HashSet<MovieId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len(), "no duplicate ids");
        assert!(!unique.contains(&1) && !unique.contains(&2), "watched excluded");
        assert!(!unique.contains(&106), "poster-less movie dropped");

        let scores: Vec<f64> = result.items.iter().map(|item| item.score.unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_personalized_matches_pipeline_ranking() {
        let catalog = Arc::new(build_catalog());
        let orchestrator = RecommendationOrchestrator::new(catalog.clone(), history_with(&[1]).await);

        let movies = orchestrator.recommend("u1").await;

        let profile = pipeline::UserProfile::from_movies([&catalog.details[&1]]).unwrap();
        let candidates: Vec<MovieRecord> = catalog.popular.iter().flatten().cloned().collect();
        let excluded: HashSet<MovieId> = [1].into_iter().collect();
        let expected: Vec<MovieId> = pipeline::score_candidates(&profile, candidates, &excluded)
            .unwrap()
            .into_iter()
            .map(|s| s.movie.id)
            .collect();

        let ids: Vec<MovieId> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_catalog_outage_returns_empty() {
        let mut catalog = build_catalog();
        catalog.fail_popular = true;
        let catalog = Arc::new(catalog);

        let personalized = RecommendationOrchestrator::new(catalog.clone(), history_with(&[1]).await);
        let result = personalized.recommend_detailed("u1").await;
        assert_eq!(result.strategy, Strategy::Personalized);
        assert!(result.items.is_empty());

        let guest = RecommendationOrchestrator::new(catalog, history_with(&[]).await);
        assert!(guest.recommend("u1").await.is_empty());
    }

    #[tokio::test]
    async fn test_scoring_failure_returns_empty() {
        let scorer = CandidateScorer::new().with_pipeline(FilterPipeline::new().add_filter(FailingFilter));
        let orchestrator = RecommendationOrchestrator::new(Arc::new(build_catalog()), history_with(&[1]).await)
            .with_scorer(scorer);

        let result = orchestrator.recommend_detailed("u1").await;
        assert_eq!(result.strategy, Strategy::Personalized);
        assert!(result.items.is_empty());

        // The guest path never scores
        let guest = orchestrator.recommend_detailed("someone-else").await;
        assert_eq!(guest.strategy, Strategy::Guest);
        assert_eq!(guest.items.len(), 20);
    }

    #[tokio::test]
    async fn test_custom_config() {
        let catalog = Arc::new(build_catalog());
        let config = RecommendConfig::default().with_candidate_pages(2).with_limit(5);
        let orchestrator =
            RecommendationOrchestrator::with_config(catalog.clone(), history_with(&[1]).await, config);

        assert_eq!(orchestrator.recommend("u1").await.len(), 5);
        assert_eq!(catalog.requested_pages(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_concurrent_requests_agree() {
        let orchestrator =
            RecommendationOrchestrator::new(Arc::new(build_catalog()), history_with(&[1, 2]).await);
        let baseline = orchestrator.recommend("u1").await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let orchestrator = orchestrator.clone();
            handles.push(tokio::spawn(async move { orchestrator.recommend("u1").await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), baseline);
        }
    }
}
