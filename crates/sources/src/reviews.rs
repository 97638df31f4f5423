//! Threaded movie reviews with like/dislike voting.
//!
//! A review either starts a thread or replies to another review of the same
//! movie. Replies to replies are attached to the thread's root so threads
//! stay one level deep. Each user holds at most one vote per review:
//! repeating the same vote retracts it, voting the other way switches it.
//!
//! Author names are not stored with a review; they are looked up from the
//! author's account profile when threads are read.

use crate::traits::HistorySource;
use data_loader::{AccountProfile, MovieId, UserId, ANONYMOUS_NAME};
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, instrument};

pub type ReviewId = u64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    #[error("Review text is empty")]
    EmptyText,

    #[error("Review not found: {0}")]
    UnknownReview(ReviewId),

    #[error("Review {review_id} belongs to another movie")]
    ReplyToOtherMovie { review_id: ReviewId },

    #[error("User {user_id} is not the author of review {review_id}")]
    NotAuthor { review_id: ReviewId, user_id: UserId },

    #[error("Review store unavailable")]
    Unavailable,
}

pub type Result<T> = std::result::Result<T, ReviewError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vote {
    Like,
    Dislike,
}

/// What a vote did to the review's tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Cast,
    Retracted,
    Switched,
}

/// How a review's author is shown
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewAuthor {
    pub name: String,
    pub avatar: Option<String>,
}

impl ReviewAuthor {
    pub fn anonymous() -> Self {
        Self {
            name: ANONYMOUS_NAME.to_string(),
            avatar: None,
        }
    }

    fn from_profile(profile: &AccountProfile) -> Self {
        Self {
            name: profile.display_name_or_anon().to_string(),
            avatar: profile.photo_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub movie_id: MovieId,
    pub movie_title: Option<String>,
    pub user_id: UserId,
    /// Anonymous until resolved by [`ReviewBoard::threads_with_authors`]
    pub author: ReviewAuthor,
    pub text: String,
    /// Root review this one replies to
    pub reply_to: Option<ReviewId>,
    pub likes: u32,
    pub dislikes: u32,
}

/// A top-level review and its replies, both in posting order
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewThread {
    pub review: Review,
    pub replies: Vec<Review>,
}

/// Input for [`ReviewBoard::add_review`]
#[derive(Debug, Clone)]
pub struct NewReview {
    pub movie_id: MovieId,
    pub movie_title: Option<String>,
    pub user_id: UserId,
    pub text: String,
    pub reply_to: Option<ReviewId>,
}

#[derive(Default)]
struct BoardState {
    next_id: ReviewId,
    // Ids increase monotonically, so BTreeMap order is posting order.
    reviews: BTreeMap<ReviewId, Review>,
    votes: HashMap<(ReviewId, UserId), Vote>,
}

/// In-memory review store
#[derive(Default)]
pub struct ReviewBoard {
    state: RwLock<BoardState>,
}

impl ReviewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a review or a reply
    #[instrument(skip(self, new), fields(movie_id = new.movie_id, user_id = %new.user_id))]
    pub fn add_review(&self, new: NewReview) -> Result<Review> {
        let text = new.text.trim();
        if text.is_empty() {
            return Err(ReviewError::EmptyText);
        }

        let mut state = self.state.write().map_err(|_| ReviewError::Unavailable)?;

        let reply_to = match new.reply_to {
            Some(parent_id) => {
                let parent = state
                    .reviews
                    .get(&parent_id)
                    .ok_or(ReviewError::UnknownReview(parent_id))?;
                if parent.movie_id != new.movie_id {
                    return Err(ReviewError::ReplyToOtherMovie { review_id: parent_id });
                }
                Some(parent.reply_to.unwrap_or(parent.id))
            }
            None => None,
        };

        state.next_id += 1;
        let review = Review {
            id: state.next_id,
            movie_id: new.movie_id,
            movie_title: new.movie_title,
            user_id: new.user_id,
            author: ReviewAuthor::anonymous(),
            text: text.to_string(),
            reply_to,
            likes: 0,
            dislikes: 0,
        };
        state.reviews.insert(review.id, review.clone());
        debug!("Posted review {}", review.id);
        Ok(review)
    }

    /// Cast, switch or retract a user's vote on a review
    #[instrument(skip(self))]
    pub fn vote(&self, review_id: ReviewId, user_id: &str, vote: Vote) -> Result<VoteOutcome> {
        let mut guard = self.state.write().map_err(|_| ReviewError::Unavailable)?;
        let state = &mut *guard;

        let review = state
            .reviews
            .get_mut(&review_id)
            .ok_or(ReviewError::UnknownReview(review_id))?;

        let key = (review_id, user_id.to_string());
        let outcome = match state.votes.get(&key).copied() {
            Some(previous) if previous == vote => {
                state.votes.remove(&key);
                decrement(review, vote);
                VoteOutcome::Retracted
            }
            Some(previous) => {
                state.votes.insert(key, vote);
                decrement(review, previous);
                increment(review, vote);
                VoteOutcome::Switched
            }
            None => {
                state.votes.insert(key, vote);
                increment(review, vote);
                VoteOutcome::Cast
            }
        };
        Ok(outcome)
    }

    /// Delete a review written by `user_id`, together with its replies and votes
    #[instrument(skip(self))]
    pub fn delete_review(&self, review_id: ReviewId, user_id: &str) -> Result<()> {
        let mut state = self.state.write().map_err(|_| ReviewError::Unavailable)?;

        let review = state
            .reviews
            .get(&review_id)
            .ok_or(ReviewError::UnknownReview(review_id))?;
        if review.user_id != user_id {
            return Err(ReviewError::NotAuthor {
                review_id,
                user_id: user_id.to_string(),
            });
        }

        let removed: Vec<ReviewId> = state
            .reviews
            .values()
            .filter(|r| r.id == review_id || r.reply_to == Some(review_id))
            .map(|r| r.id)
            .collect();
        for id in &removed {
            state.reviews.remove(id);
        }
        state.votes.retain(|(id, _), _| !removed.contains(id));

        debug!("Deleted {} reviews", removed.len());
        Ok(())
    }

    pub fn get(&self, review_id: ReviewId) -> Result<Review> {
        let state = self.state.read().map_err(|_| ReviewError::Unavailable)?;
        state
            .reviews
            .get(&review_id)
            .cloned()
            .ok_or(ReviewError::UnknownReview(review_id))
    }

    /// All threads for a movie, oldest first
    pub fn threads_for_movie(&self, movie_id: MovieId) -> Result<Vec<ReviewThread>> {
        let state = self.state.read().map_err(|_| ReviewError::Unavailable)?;

        let mut threads: Vec<ReviewThread> = Vec::new();
        let mut positions: HashMap<ReviewId, usize> = HashMap::new();

        for review in state.reviews.values().filter(|r| r.movie_id == movie_id) {
            match review.reply_to {
                None => {
                    positions.insert(review.id, threads.len());
                    threads.push(ReviewThread {
                        review: review.clone(),
                        replies: Vec::new(),
                    });
                }
                Some(root) => {
                    if let Some(&pos) = positions.get(&root) {
                        threads[pos].replies.push(review.clone());
                    }
                }
            }
        }
        Ok(threads)
    }

    /// [`threads_for_movie`](Self::threads_for_movie) with each author's
    /// display name and avatar filled in.
    ///
    /// Profiles are fetched once per distinct author, concurrently. Authors
    /// without a profile, or whose profile cannot be read, show as `anon`.
    pub async fn threads_with_authors(
        &self,
        movie_id: MovieId,
        profiles: &dyn HistorySource,
    ) -> Result<Vec<ReviewThread>> {
        let mut threads = self.threads_for_movie(movie_id)?;

        let mut authors: Vec<UserId> = threads
            .iter()
            .flat_map(|t| std::iter::once(&t.review).chain(&t.replies))
            .map(|r| r.user_id.clone())
            .collect();
        authors.sort();
        authors.dedup();

        let lookups = join_all(authors.iter().map(|user_id| profiles.get_profile(user_id))).await;
        let resolved: HashMap<UserId, ReviewAuthor> = authors
            .into_iter()
            .zip(lookups)
            .map(|(user_id, lookup)| {
                let author = match lookup {
                    Ok(Some(profile)) => ReviewAuthor::from_profile(&profile),
                    Ok(None) => ReviewAuthor::anonymous(),
                    Err(e) => {
                        debug!("Profile of {} unavailable: {}", user_id, e);
                        ReviewAuthor::anonymous()
                    }
                };
                (user_id, author)
            })
            .collect();

        for thread in &mut threads {
            for review in std::iter::once(&mut thread.review).chain(thread.replies.iter_mut()) {
                if let Some(author) = resolved.get(&review.user_id) {
                    review.author = author.clone();
                }
            }
        }
        Ok(threads)
    }

    /// Every review a user has written, oldest first
    pub fn reviews_by_user(&self, user_id: &str) -> Result<Vec<Review>> {
        let state = self.state.read().map_err(|_| ReviewError::Unavailable)?;
        Ok(state
            .reviews
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

fn increment(review: &mut Review, vote: Vote) {
    match vote {
        Vote::Like => review.likes += 1,
        Vote::Dislike => review.dislikes += 1,
    }
}

fn decrement(review: &mut Review, vote: Vote) {
    match vote {
        Vote::Like => review.likes = review.likes.saturating_sub(1),
        Vote::Dislike => review.dislikes = review.dislikes.saturating_sub(1),
    }
}
