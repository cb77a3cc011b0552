//! Profile store interface.
//!
//! The key-value profile store is an external collaborator; the engine
//! only needs point reads keyed by user id and a few append-style
//! updates. Writes are idempotent by id where duplication would matter
//! (adding the same favorite twice is a conflict, not a silent dup).

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{FavoriteBook, HistoryEntry, Interaction, UserId, UserProfile};

/// Errors from the profile store collaborator
#[derive(Error, Debug)]
pub enum ProfileError {
    /// The profile must exist for this operation and does not
    #[error("Profile not found for user {user_id}")]
    NotFound { user_id: UserId },

    /// Write rejected because it would duplicate an existing entry
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store itself is unreachable or failed
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Async interface to the user profile store.
///
/// # Design Notes
///
/// - `get_profile` treats absence as `Ok(None)`; only store-level
///   failures are errors.
/// - Append operations enforce the documented bounds
///   ([`crate::types::MAX_INTERACTIONS`],
///   [`crate::types::MAX_HISTORY_SESSIONS`]) so no caller can grow a
///   profile without limit.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Point read of a profile document.
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Full-document write, last write wins.
    async fn put_profile(&self, profile: UserProfile) -> Result<()>;

    /// Add a favorite; a second add of the same book id is a conflict.
    async fn add_favorite(&self, user_id: &str, favorite: FavoriteBook) -> Result<()>;

    /// Append to the rolling interaction log, dropping the oldest
    /// entries past the cap.
    async fn append_interaction(&self, user_id: &str, interaction: Interaction) -> Result<()>;

    /// Append a recommendation session, keeping only the most recent
    /// sessions up to the cap.
    async fn append_history(&self, user_id: &str, entry: HistoryEntry) -> Result<()>;
}
