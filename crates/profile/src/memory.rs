//! In-memory profile store.
//!
//! HashMap behind a `tokio::sync::RwLock`, last write wins. Backs the
//! demo binary and every test that needs a store collaborator.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::store::{ProfileError, ProfileStore, Result};
use crate::types::{
    FavoriteBook, HistoryEntry, Interaction, MAX_HISTORY_SESSIONS, MAX_INTERACTIONS, UserProfile,
};

#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with profiles (demo/test setup).
    pub async fn seed(&self, profiles: impl IntoIterator<Item = UserProfile>) {
        let mut guard = self.profiles.write().await;
        for profile in profiles {
            guard.insert(profile.user_id.clone(), profile);
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn put_profile(&self, profile: UserProfile) -> Result<()> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile);
        Ok(())
    }

    async fn add_favorite(&self, user_id: &str, favorite: FavoriteBook) -> Result<()> {
        let mut guard = self.profiles.write().await;
        let profile = guard
            .get_mut(user_id)
            .ok_or_else(|| ProfileError::NotFound {
                user_id: user_id.to_string(),
            })?;

        if profile
            .favorite_books
            .iter()
            .any(|f| f.book.id == favorite.book.id)
        {
            return Err(ProfileError::Conflict(format!(
                "book {} is already a favorite",
                favorite.book.id
            )));
        }
        profile.favorite_books.push(favorite);
        Ok(())
    }

    async fn append_interaction(&self, user_id: &str, interaction: Interaction) -> Result<()> {
        let mut guard = self.profiles.write().await;
        let profile = guard
            .get_mut(user_id)
            .ok_or_else(|| ProfileError::NotFound {
                user_id: user_id.to_string(),
            })?;

        let learning = &mut profile.ml_learning;
        learning.interactions.push(interaction);
        if learning.interactions.len() > MAX_INTERACTIONS {
            let excess = learning.interactions.len() - MAX_INTERACTIONS;
            learning.interactions.drain(..excess);
        }
        learning.last_updated = Some(Utc::now());
        Ok(())
    }

    async fn append_history(&self, user_id: &str, entry: HistoryEntry) -> Result<()> {
        let mut guard = self.profiles.write().await;
        let profile = guard
            .get_mut(user_id)
            .ok_or_else(|| ProfileError::NotFound {
                user_id: user_id.to_string(),
            })?;

        profile.recommendation_history.push(entry);
        if profile.recommendation_history.len() > MAX_HISTORY_SESSIONS {
            let excess = profile.recommendation_history.len() - MAX_HISTORY_SESSIONS;
            profile.recommendation_history.drain(..excess);
        }
        Ok(())
    }
}
