//! In-memory per-user store: personal lists and account profiles.

use crate::error::{Result, SourceError};
use crate::traits::HistorySource;
use crate::types::ListToggle;
use async_trait::async_trait;
use data_loader::{AccountProfile, DataIndex, ListEntry, ListKind, UserId, UserLists};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, instrument};

/// History source keeping every user's lists in a shared map.
///
/// Unknown users have empty lists and no profile. The locks are never held
/// across an await.
#[derive(Default)]
pub struct InMemoryHistory {
    lists: RwLock<HashMap<UserId, UserLists>>,
    profiles: RwLock<HashMap<UserId, AccountProfile>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with the lists and profiles loaded into a DataIndex
    pub fn from_index(data_index: &DataIndex) -> Self {
        let mut lists = HashMap::new();
        let mut profiles = HashMap::new();
        for id in data_index.user_ids() {
            if let Some(user_lists) = data_index.get_user_lists(id) {
                lists.insert(id.clone(), user_lists.clone());
            }
            if let Some(profile) = data_index.get_account_profile(id) {
                profiles.insert(id.clone(), profile.clone());
            }
        }

        Self {
            lists: RwLock::new(lists),
            profiles: RwLock::new(profiles),
        }
    }

    /// Replace one user's lists
    pub fn insert_user(&self, user_id: impl Into<UserId>, lists: UserLists) -> Result<()> {
        let mut guard = self.lists.write().map_err(|_| poisoned())?;
        guard.insert(user_id.into(), lists);
        Ok(())
    }
}

fn poisoned() -> SourceError {
    SourceError::Unavailable("history store lock poisoned".to_string())
}

#[async_trait]
impl HistorySource for InMemoryHistory {
    #[instrument(skip(self))]
    async fn list(&self, user_id: &str, kind: ListKind) -> Result<Vec<ListEntry>> {
        let guard = self.lists.read().map_err(|_| poisoned())?;
        Ok(guard
            .get(user_id)
            .map(|lists| lists.get(kind).to_vec())
            .unwrap_or_default())
    }

    #[instrument(skip(self, entry), fields(movie_id = entry.movie_id))]
    async fn toggle(&self, user_id: &str, kind: ListKind, entry: ListEntry) -> Result<ListToggle> {
        let mut guard = self.lists.write().map_err(|_| poisoned())?;
        let list = guard.entry(user_id.to_string()).or_default().get_mut(kind);

        let outcome = match list.iter().position(|e| e.movie_id == entry.movie_id) {
            Some(pos) => {
                list.remove(pos);
                ListToggle::Removed
            }
            None => {
                list.push(entry);
                ListToggle::Added
            }
        };
        debug!("{:?} in {}", outcome, kind);
        Ok(outcome)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<AccountProfile>> {
        let guard = self.profiles.read().map_err(|_| poisoned())?;
        Ok(guard.get(user_id).cloned())
    }

    #[instrument(skip(self, profile))]
    async fn update_profile(&self, user_id: &str, profile: AccountProfile) -> Result<()> {
        let profile = AccountProfile::new(profile.display_name, profile.photo_url);
        let mut guard = self.profiles.write().map_err(|_| poisoned())?;
        guard.insert(user_id.to_string(), profile);
        debug!("Profile updated");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "InMemoryHistory"
    }
}
