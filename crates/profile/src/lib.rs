//! # Profile Crate
//!
//! User profile documents and the store collaborator that persists them.
//!
//! ## Main Components
//!
//! - **types**: [`UserProfile`], reading lists, preferences, the bounded
//!   interaction log and recommendation history
//! - **store**: [`ProfileStore`] async trait and [`ProfileError`]
//! - **memory**: [`MemoryProfileStore`] for tests and demos

// Public modules
pub mod memory;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use memory::MemoryProfileStore;
pub use store::{ProfileError, ProfileStore, Result};
pub use types::{
    ComplexityLevel, FavoriteBook, HistoryEntry, HistoryItem, Interaction, InteractionKind,
    ListEntry, MlLearning, PreferredLength, ReadingList, ReadingPreferences, ReadingStatus,
    UserId, UserProfile, MAX_HISTORY_SESSIONS, MAX_INTERACTIONS,
};
