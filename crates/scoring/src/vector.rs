//! Feature vectors for users and books.
//!
//! Both sides of the similarity computation share one shape: normalized
//! genre/author weight maps plus scalar taste signals. User vectors are
//! rebuilt from the profile on every recommendation request; book
//! vectors are built per candidate. Neither is ever persisted as a
//! source of truth.

use std::collections::BTreeMap;

use catalog::{enrich, BookRecord, EnrichedBook};
use profile::{ComplexityLevel, InteractionKind, PreferredLength, UserProfile};
use serde::{Deserialize, Serialize};

/// Baseline scalar values for users with no reading history
const DEFAULT_COMPLEXITY: f64 = 2.5;
const DEFAULT_PAGE_LENGTH: f64 = 300.0;
const DEFAULT_RECENCY: f64 = 2.5;
const DEFAULT_RATING: f64 = 4.0;

/// Per-interaction nudge applied to each touched genre/author weight
const NUDGE_STEP: f64 = 0.1;

/// Shared feature shape for user taste profiles and book candidates.
///
/// `genres` and `authors` use `BTreeMap` so iteration order (and with it
/// top-genre selection and tie-breaking) is deterministic: ties break
/// alphabetically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Genre name to normalized weight; sums to 1.0 when non-empty
    /// (except after biasing/nudging, which deliberately un-normalizes)
    pub genres: BTreeMap<String, f64>,
    /// Author name to normalized weight; same normalization contract
    pub authors: BTreeMap<String, f64>,
    /// 0 to 5
    pub complexity: f64,
    /// Expected page count
    pub page_length: f64,
    /// 0 to 5, higher means newer
    pub recency: f64,
    /// 0 to 5
    pub rating: f64,
    /// Unbounded; meaningful on book vectors only
    pub popularity: f64,
    /// Number of source books behind a user vector; 0 for defaults and
    /// book vectors
    pub total_books: u32,
}

impl FeatureVector {
    /// Top `n` genres by weight, descending; alphabetical tie-break.
    pub fn top_genres(&self, n: usize) -> Vec<&str> {
        top_weighted(&self.genres, n)
    }

    /// Top `n` authors by weight, descending; alphabetical tie-break.
    pub fn top_authors(&self, n: usize) -> Vec<&str> {
        top_weighted(&self.authors, n)
    }

    /// Additive preference nudge from a single interaction.
    ///
    /// Adds `0.1 x interaction weight` to each of the book's genre and
    /// author entries. This intentionally leaves the maps un-normalized;
    /// the next full rebuild restores the proportion invariant.
    pub fn nudge(&mut self, book: &BookRecord, kind: InteractionKind) {
        let step = NUDGE_STEP * kind.weight();
        for genre in &book.categories {
            *self.genres.entry(genre.clone()).or_insert(0.0) += step;
        }
        for author in &book.authors {
            *self.authors.entry(author.clone()).or_insert(0.0) += step;
        }
    }
}

fn top_weighted(map: &BTreeMap<String, f64>, n: usize) -> Vec<&str> {
    let mut entries: Vec<(&str, f64)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    // Stable sort over alphabetical BTreeMap order keeps ties deterministic
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries.into_iter().take(n).map(|(k, _)| k).collect()
}

/// Build a user's taste vector from their reading history.
///
/// Gathers favorites plus every reading-list book marked read. With no
/// history at all this falls back to [`build_default_vector`].
///
/// ## Algorithm
/// Per book: count each category and author, accumulate complexity
/// (recomputed from the record), page count, recency score, and average
/// rating. Scalars become arithmetic means over the book count;
/// genre/author counters normalize to proportions summing to 1.0
/// (normalization is skipped for an all-zero counter sum).
pub fn build_user_vector(user: &UserProfile, current_year: i32) -> FeatureVector {
    let books = user.read_books();
    if books.is_empty() {
        return build_default_vector(user);
    }

    let mut vector = FeatureVector::default();
    for book in &books {
        vector.total_books += 1;

        for genre in &book.categories {
            *vector.genres.entry(genre.clone()).or_insert(0.0) += 1.0;
        }
        for author in &book.authors {
            *vector.authors.entry(author.clone()).or_insert(0.0) += 1.0;
        }

        vector.complexity += enrich::complexity_score(book) as f64;
        vector.page_length += book.page_count.unwrap_or(0) as f64;
        vector.recency += enrich::recency_score(book, current_year);
        vector.rating += book.average_rating.unwrap_or(0.0);
    }

    let n = vector.total_books as f64;
    vector.complexity /= n;
    vector.page_length /= n;
    vector.recency /= n;
    vector.rating /= n;

    normalize(&mut vector.genres);
    normalize(&mut vector.authors);

    vector
}

/// Baseline vector for users with no reading history.
///
/// Stated favorite genres split a uniform 1/N weight; stated reading
/// preferences shift complexity (easy 1.5, hard 4.0) and page length
/// (short 200, long 500) off the medium defaults.
pub fn build_default_vector(user: &UserProfile) -> FeatureVector {
    let mut vector = FeatureVector {
        complexity: DEFAULT_COMPLEXITY,
        page_length: DEFAULT_PAGE_LENGTH,
        recency: DEFAULT_RECENCY,
        rating: DEFAULT_RATING,
        ..Default::default()
    };

    if !user.favorite_genres.is_empty() {
        let weight = 1.0 / user.favorite_genres.len() as f64;
        for genre in &user.favorite_genres {
            vector.genres.insert(genre.clone(), weight);
        }
    }

    match user.reading_preferences.complexity {
        Some(ComplexityLevel::Easy) => vector.complexity = 1.5,
        Some(ComplexityLevel::Hard) => vector.complexity = 4.0,
        _ => {}
    }
    match user.reading_preferences.length {
        Some(PreferredLength::Short) => vector.page_length = 200.0,
        Some(PreferredLength::Long) => vector.page_length = 500.0,
        _ => {}
    }

    vector
}

/// Feature vector for a single candidate book.
///
/// Genres and authors get an equal 1/N split (per-book, not
/// corpus-normalized); absent page count and rating fall back to the
/// medium defaults the user side uses.
pub fn build_book_vector(book: &EnrichedBook, current_year: i32) -> FeatureVector {
    let record = &book.record;
    let mut vector = FeatureVector {
        complexity: book.complexity_score as f64,
        page_length: record.page_count.unwrap_or(300) as f64,
        recency: enrich::recency_score(record, current_year),
        rating: record.average_rating.unwrap_or(3.0),
        popularity: book.popularity_score,
        ..Default::default()
    };

    if !record.categories.is_empty() {
        let weight = 1.0 / record.categories.len() as f64;
        for genre in &record.categories {
            vector.genres.insert(genre.clone(), weight);
        }
    }
    if !record.authors.is_empty() {
        let weight = 1.0 / record.authors.len() as f64;
        for author in &record.authors {
            vector.authors.insert(author.clone(), weight);
        }
    }

    vector
}

/// Blend a user vector toward a source book for "more like this" flows.
///
/// Source-book genres gain +0.3, authors +0.5; complexity and page
/// length move two-thirds of the way toward the book. The boosted maps
/// are deliberately left un-normalized so the bias actually dominates
/// top-genre selection.
pub fn bias_toward(user_vector: &FeatureVector, book_vector: &FeatureVector) -> FeatureVector {
    let mut biased = user_vector.clone();

    for genre in book_vector.genres.keys() {
        *biased.genres.entry(genre.clone()).or_insert(0.0) += 0.3;
    }
    for author in book_vector.authors.keys() {
        *biased.authors.entry(author.clone()).or_insert(0.0) += 0.5;
    }

    biased.complexity = (user_vector.complexity + book_vector.complexity * 2.0) / 3.0;
    biased.page_length = (user_vector.page_length + book_vector.page_length * 2.0) / 3.0;

    biased
}

/// Normalize counters to proportions; skipped when the sum is zero.
fn normalize(map: &mut BTreeMap<String, f64>) {
    let total: f64 = map.values().sum();
    if total == 0.0 {
        return;
    }
    for value in map.values_mut() {
        *value /= total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use profile::{FavoriteBook, ListEntry, ReadingList, ReadingPreferences, ReadingStatus};

    const YEAR: i32 = 2026;

    fn record(id: &str, categories: &[&str], authors: &[&str]) -> BookRecord {
        BookRecord {
            id: id.to_string(),
            title: id.to_string(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            authors: authors.iter().map(|s| s.to_string()).collect(),
            page_count: Some(320),
            average_rating: Some(4.2),
            published_date: Some("2018".to_string()),
            ratings_count: 120,
            ..Default::default()
        }
    }

    fn profile_with_history() -> UserProfile {
        let mut user = UserProfile::new("u1");
        user.favorite_books.push(FavoriteBook {
            book: record("b1", &["Fantasy", "Adventure"], &["N. K. Ortiz"]),
            added_at: Utc::now(),
        });
        user.favorite_books.push(FavoriteBook {
            book: record("b2", &["Fantasy"], &["N. K. Ortiz"]),
            added_at: Utc::now(),
        });
        user.reading_lists.push(ReadingList {
            id: "l1".to_string(),
            name: "done".to_string(),
            books: vec![ListEntry {
                book: record("b3", &["Mystery"], &["Rui Costa"]),
                status: ReadingStatus::Read,
            }],
        });
        user
    }

    fn assert_normalized(map: &BTreeMap<String, f64>) {
        let sum: f64 = map.values().sum();
        assert!((sum - 1.0).abs() < 1e-9, "weights sum to {sum}");
    }

    #[test]
    fn test_user_vector_weights_sum_to_one() {
        let vector = build_user_vector(&profile_with_history(), YEAR);
        assert_normalized(&vector.genres);
        assert_normalized(&vector.authors);
        assert_eq!(vector.total_books, 3);
    }

    #[test]
    fn test_user_vector_genre_proportions() {
        let vector = build_user_vector(&profile_with_history(), YEAR);
        // Fantasy appears twice of four category mentions
        assert!((vector.genres["Fantasy"] - 0.5).abs() < 1e-9);
        assert!((vector.genres["Mystery"] - 0.25).abs() < 1e-9);
        // Ortiz wrote two of three books
        assert!((vector.authors["N. K. Ortiz"] - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_user_vector_scalar_means() {
        let vector = build_user_vector(&profile_with_history(), YEAR);
        // All three books share the same signals, so means equal them
        assert!((vector.rating - 4.2).abs() < 1e-9);
        assert!((vector.page_length - 320.0).abs() < 1e-9);
        // 2018 at year 2026: 5 - 8/10 = 4.2
        assert!((vector.recency - 4.2).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history_falls_back_to_default() {
        let user = UserProfile::new("u1");
        let vector = build_user_vector(&user, YEAR);
        assert_eq!(vector.total_books, 0);
        assert_eq!(vector.complexity, 2.5);
        assert_eq!(vector.page_length, 300.0);
        assert_eq!(vector.rating, 4.0);
        assert!(vector.genres.is_empty());
    }

    #[test]
    fn test_default_vector_uses_stated_genres_and_prefs() {
        let mut user = UserProfile::new("u1");
        user.favorite_genres = vec!["Horror".to_string(), "Poetry".to_string()];
        user.reading_preferences = ReadingPreferences {
            complexity: Some(ComplexityLevel::Hard),
            length: Some(PreferredLength::Short),
        };

        let vector = build_default_vector(&user);
        assert!((vector.genres["Horror"] - 0.5).abs() < 1e-9);
        assert!((vector.genres["Poetry"] - 0.5).abs() < 1e-9);
        assert_eq!(vector.complexity, 4.0);
        assert_eq!(vector.page_length, 200.0);
    }

    #[test]
    fn test_book_vector_equal_split() {
        let book = enrich::enrich(record("b1", &["Fantasy", "Adventure"], &["A", "B"]), YEAR);
        let vector = build_book_vector(&book, YEAR);
        assert!((vector.genres["Fantasy"] - 0.5).abs() < 1e-9);
        assert!((vector.authors["A"] - 0.5).abs() < 1e-9);
        assert!((vector.rating - 4.2).abs() < 1e-9);
    }

    #[test]
    fn test_book_vector_defaults_for_missing_fields() {
        let bare = BookRecord {
            id: "bare".to_string(),
            title: "Bare".to_string(),
            ..Default::default()
        };
        let vector = build_book_vector(&enrich::enrich(bare, YEAR), YEAR);
        assert_eq!(vector.page_length, 300.0);
        assert_eq!(vector.rating, 3.0);
        assert_eq!(vector.recency, 0.0);
        assert_eq!(vector.popularity, 0.0);
    }

    #[test]
    fn test_top_genres_deterministic_tie_break() {
        let mut vector = FeatureVector::default();
        vector.genres.insert("Zeta".to_string(), 0.25);
        vector.genres.insert("Alpha".to_string(), 0.25);
        vector.genres.insert("Mid".to_string(), 0.5);

        assert_eq!(vector.top_genres(3), vec!["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_bias_toward_boosts_source_book() {
        let user = build_user_vector(&profile_with_history(), YEAR);
        let book = enrich::enrich(record("src", &["Mystery"], &["Rui Costa"]), YEAR);
        let book_vector = build_book_vector(&book, YEAR);

        let biased = bias_toward(&user, &book_vector);
        assert!(biased.genres["Mystery"] > user.genres["Mystery"]);
        assert!(biased.authors["Rui Costa"] > user.authors["Rui Costa"]);
        // Mystery now outranks Fantasy (0.25 + 0.3 > 0.5)
        assert_eq!(biased.top_genres(1), vec!["Mystery"]);
    }

    #[test]
    fn test_nudge_adds_weighted_step() {
        let mut vector = FeatureVector::default();
        let book = record("b1", &["Horror"], &["A"]);

        vector.nudge(&book, InteractionKind::Favorite);
        assert!((vector.genres["Horror"] - 0.2).abs() < 1e-9);
        assert!((vector.authors["A"] - 0.2).abs() < 1e-9);

        vector.nudge(&book, InteractionKind::Search);
        assert!((vector.genres["Horror"] - 0.25).abs() < 1e-9);
    }
}
