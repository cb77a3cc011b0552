//! User profile domain types.
//!
//! A profile is the storage collaborator's document: favorites, reading
//! lists, stated preferences, and the bounded interaction log the
//! recommendation engine learns from. The scoring core only ever reads
//! these (plus the append-style updates the store exposes); it never
//! persists derived vectors back into them.

use catalog::BookRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque user identifier assigned by the outer application
pub type UserId = String;

/// Cap on the rolling interaction log
pub const MAX_INTERACTIONS: usize = 50;

/// Cap on stored recommendation sessions
pub const MAX_HISTORY_SESSIONS: usize = 10;

/// A favorited book with the moment it was added
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteBook {
    pub book: BookRecord,
    pub added_at: DateTime<Utc>,
}

/// Where a book sits in a reading list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    ToRead,
    Reading,
    Read,
}

/// One entry in a reading list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEntry {
    pub book: BookRecord,
    pub status: ReadingStatus,
}

/// A named reading list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingList {
    pub id: String,
    pub name: String,
    pub books: Vec<ListEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredLength {
    Short,
    Medium,
    Long,
}

/// Stated reading preferences; unset fields mean "no stated preference"
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReadingPreferences {
    pub complexity: Option<ComplexityLevel>,
    pub length: Option<PreferredLength>,
}

/// How a user touched a book; drives the preference-nudge weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Favorite,
    Read,
    AddedToList,
    Search,
}

impl InteractionKind {
    /// Weight applied when nudging genre/author preferences
    pub fn weight(self) -> f64 {
        match self {
            InteractionKind::Favorite => 2.0,
            InteractionKind::Read => 1.5,
            InteractionKind::AddedToList => 1.0,
            InteractionKind::Search => 0.5,
        }
    }
}

/// One recorded interaction with a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub book_id: String,
    pub kind: InteractionKind,
    pub at: DateTime<Utc>,
    pub genres: Vec<String>,
    pub authors: Vec<String>,
}

/// Rolling learning state carried on the profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MlLearning {
    pub interactions: Vec<Interaction>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// One item of a stored recommendation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    pub book_id: String,
    pub title: String,
    pub score: f64,
    pub explanation: String,
}

/// One stored recommendation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub at: DateTime<Utc>,
    pub items: Vec<HistoryItem>,
}

/// The full profile document keyed by user id in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    #[serde(default)]
    pub favorite_books: Vec<FavoriteBook>,
    #[serde(default)]
    pub reading_lists: Vec<ReadingList>,
    #[serde(default)]
    pub favorite_genres: Vec<String>,
    #[serde(default)]
    pub reading_preferences: ReadingPreferences,
    /// Gate for the scored recommendation path
    #[serde(default)]
    pub ml_enabled: bool,
    #[serde(default)]
    pub ml_learning: MlLearning,
    #[serde(default)]
    pub recommendation_history: Vec<HistoryEntry>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            favorite_books: Vec::new(),
            reading_lists: Vec::new(),
            favorite_genres: Vec::new(),
            reading_preferences: ReadingPreferences::default(),
            ml_enabled: true,
            ml_learning: MlLearning::default(),
            recommendation_history: Vec::new(),
        }
    }

    /// Favorites plus every reading-list entry marked read.
    ///
    /// This is the source set for the user taste vector.
    pub fn read_books(&self) -> Vec<&BookRecord> {
        let mut books: Vec<&BookRecord> = self.favorite_books.iter().map(|f| &f.book).collect();
        books.extend(
            self.reading_lists
                .iter()
                .flat_map(|list| &list.books)
                .filter(|entry| entry.status == ReadingStatus::Read)
                .map(|entry| &entry.book),
        );
        books
    }

    /// Ids of every book the user has touched: favorites plus all list
    /// entries regardless of status. Used for exclude-read filtering.
    pub fn seen_ids(&self) -> HashSet<&str> {
        let mut ids: HashSet<&str> = self
            .favorite_books
            .iter()
            .map(|f| f.book.id.as_str())
            .collect();
        ids.extend(
            self.reading_lists
                .iter()
                .flat_map(|list| &list.books)
                .map(|entry| entry.book.id.as_str()),
        );
        ids
    }

    /// Distinct categories across favorited books
    pub fn favorite_categories(&self) -> HashSet<&str> {
        self.favorite_books
            .iter()
            .flat_map(|f| &f.book.categories)
            .map(String::as_str)
            .collect()
    }

    /// Distinct authors across favorited books
    pub fn favorite_authors(&self) -> HashSet<&str> {
        self.favorite_books
            .iter()
            .flat_map(|f| &f.book.authors)
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, categories: &[&str]) -> BookRecord {
        BookRecord {
            id: id.to_string(),
            title: id.to_string(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn profile_with_lists() -> UserProfile {
        let mut profile = UserProfile::new("u1");
        profile.favorite_books.push(FavoriteBook {
            book: book("fav-1", &["Fantasy"]),
            added_at: Utc::now(),
        });
        profile.reading_lists.push(ReadingList {
            id: "l1".to_string(),
            name: "2026".to_string(),
            books: vec![
                ListEntry {
                    book: book("read-1", &["Mystery"]),
                    status: ReadingStatus::Read,
                },
                ListEntry {
                    book: book("toread-1", &["Romance"]),
                    status: ReadingStatus::ToRead,
                },
            ],
        });
        profile
    }

    #[test]
    fn test_read_books_includes_only_read_status() {
        let profile = profile_with_lists();
        let ids: Vec<&str> = profile.read_books().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["fav-1", "read-1"]);
    }

    #[test]
    fn test_seen_ids_covers_all_statuses() {
        let profile = profile_with_lists();
        let seen = profile.seen_ids();
        assert!(seen.contains("fav-1"));
        assert!(seen.contains("read-1"));
        assert!(seen.contains("toread-1"));
    }

    #[test]
    fn test_interaction_weights() {
        assert_eq!(InteractionKind::Favorite.weight(), 2.0);
        assert_eq!(InteractionKind::Read.weight(), 1.5);
        assert_eq!(InteractionKind::AddedToList.weight(), 1.0);
        assert_eq!(InteractionKind::Search.weight(), 0.5);
    }
}
