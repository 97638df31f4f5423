//! Pipeline for turning watch history into ranked recommendations.
//!
//! This crate provides:
//! - FeatureVector encoding of movies (genre one-hot, rating, year)
//! - Cosine similarity
//! - UserProfile built from resolved watch history
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - CandidateScorer for ranking the survivors
//!
//! ## Architecture
//! The pipeline processes a request in stages:
//! 1. Watched entries are resolved and averaged into a profile
//! 2. Filters remove unusable, watched and repeated candidates
//! 3. Survivors are scored against the profile and the top N kept
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{build_profile_from_catalog, CandidateScorer};
//!
//! let Some(profile) = build_profile_from_catalog(&context.watched, catalog.as_ref()).await else {
//!     // cannot personalize
//! };
//! let ranked = CandidateScorer::new().score_candidates(&profile, candidates, &context.watched_movies)?;
//! ```

pub mod features;
pub mod filter_pipeline;
pub mod filters;
pub mod profile;
pub mod scorer;
pub mod similarity;
pub mod traits;

// Re-export main types
pub use features::{compute_features, FeatureVector, FEATURE_LEN, GENRE_SLOTS};
pub use filter_pipeline::FilterPipeline;
pub use profile::{build_profile, build_profile_from_catalog, UserProfile};
pub use scorer::{score_candidates, CandidateScorer, ScoredCandidate, DEFAULT_LIMIT};
pub use similarity::cosine_similarity;
pub use traits::Filter;
