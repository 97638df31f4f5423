//! Recommendation policy knobs.

use pipeline::DEFAULT_LIMIT;

/// How many listing pages to fetch and how many results to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendConfig {
    /// Popular pages gathered as candidates for a personalized request
    pub candidate_pages: u32,
    /// Popular pages gathered for the guest path
    pub guest_pages: u32,
    /// Maximum number of recommendations returned
    pub limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            candidate_pages: 3,
            guest_pages: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl RecommendConfig {
    /// Configure candidate pages (default: 3, at least 1)
    pub fn with_candidate_pages(mut self, pages: u32) -> Self {
        self.candidate_pages = pages.max(1);
        self
    }

    /// Configure guest pages (default: 1, at least 1)
    pub fn with_guest_pages(mut self, pages: u32) -> Self {
        self.guest_pages = pages.max(1);
        self
    }

    /// Configure the result limit (default: 20)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
