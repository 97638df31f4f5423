//! Home feed: curated listings plus recommendations, fetched together.

use std::time::Instant;

use tracing::{info, instrument, warn};

use data_loader::{Category, MovieRecord};

use crate::orchestrator::RecommendationOrchestrator;

/// Rows shown on the home screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFeed {
    pub top_rated: Vec<MovieRecord>,
    pub upcoming: Vec<MovieRecord>,
    pub now_playing: Vec<MovieRecord>,
    /// Personalized when a user is given, guest list otherwise
    pub recommended: Vec<MovieRecord>,
}

impl HomeFeed {
    pub fn is_empty(&self) -> bool {
        self.top_rated.is_empty()
            && self.upcoming.is_empty()
            && self.now_playing.is_empty()
            && self.recommended.is_empty()
    }
}

impl RecommendationOrchestrator {
    /// Build the home feed. All rows load concurrently.
    ///
    /// A row whose listing fails is left empty; the other rows still load.
    #[instrument(skip(self))]
    pub async fn home_feed(&self, user_id: Option<&str>) -> HomeFeed {
        let start_time = Instant::now();

        let recommended = async {
            match user_id {
                Some(user_id) => self.recommend(user_id).await,
                None => self.recommend_guest().await.into_movies(),
            }
        };

        let (top_rated, upcoming, now_playing, recommended) = tokio::join!(
            self.category_row(Category::TopRated),
            self.category_row(Category::Upcoming),
            self.category_row(Category::NowPlaying),
            recommended,
        );

        info!("Home feed built in {:.2?}", start_time.elapsed());

        HomeFeed {
            top_rated,
            upcoming,
            now_playing,
            recommended,
        }
    }

    async fn category_row(&self, category: Category) -> Vec<MovieRecord> {
        match self.catalog().list_category(category, 1).await {
            Ok(movies) => movies,
            Err(e) => {
                warn!("Feed row {} unavailable: {}", category, e);
                Vec::new()
            }
        }
    }
}
