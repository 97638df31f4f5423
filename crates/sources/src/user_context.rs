//! Builds a UserContext from a history source.

use crate::error::Result;
use crate::traits::HistorySource;
use crate::types::UserContext;
use tracing::{debug, instrument};

/// Fetch the user's watched list and index it for exclusion lookups.
///
/// Errors from the history source are returned unchanged; deciding how to
/// degrade is the caller's business.
#[instrument(skip(history), fields(source = history.name()))]
pub async fn build_user_context(history: &dyn HistorySource, user_id: &str) -> Result<UserContext> {
    let watched = history.list_watched(user_id).await?;
    let context = UserContext::with_watched(user_id, watched);

    debug!(
        "Built context for user {} ({} watched, {} distinct)",
        context.user_id,
        context.watched.len(),
        context.watched_movies.len()
    );
    Ok(context)
}
