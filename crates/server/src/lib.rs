//! Server crate for the movie recommendation engine.
//!
//! This crate contains the orchestrator that coordinates all components
//! of the recommendation pipeline, plus the home feed built on top of it.

pub mod config;
pub mod feed;
pub mod orchestrator;

pub use config::RecommendConfig;
pub use feed::HomeFeed;
pub use orchestrator::{MovieRecommendation, Recommendations, RecommendationOrchestrator, Strategy};
