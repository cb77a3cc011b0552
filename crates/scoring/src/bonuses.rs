//! Ranking bonuses layered on top of raw similarity.
//!
//! All three are pure functions of the candidate record and the profile,
//! and all are individually capped so no bonus can drown the similarity
//! signal.

use catalog::{enrich, BookRecord};
use profile::UserProfile;

/// Cap on the combined diversity bonus
const DIVERSITY_CAP: f64 = 0.3;
/// Cap on the popularity bonus
const POPULARITY_CAP: f64 = 0.2;

/// Exploration bonus for candidates outside the user's comfort zone.
///
/// +0.1 per candidate category the user's favorites don't cover and
/// +0.05 per new author, capped at 0.3.
pub fn diversity_bonus(book: &BookRecord, user: &UserProfile) -> f64 {
    let known_genres = user.favorite_categories();
    let known_authors = user.favorite_authors();

    let new_genres = book
        .categories
        .iter()
        .filter(|g| !known_genres.contains(g.as_str()))
        .count();
    let new_authors = book
        .authors
        .iter()
        .filter(|a| !known_authors.contains(a.as_str()))
        .count();

    (new_genres as f64 * 0.1 + new_authors as f64 * 0.05).min(DIVERSITY_CAP)
}

/// Log-damped popularity bonus: `min(ln(1 + count) x rating / 100, 0.2)`.
pub fn popularity_bonus(book: &BookRecord) -> f64 {
    let ratings_count = book.ratings_count as f64;
    let average_rating = book.average_rating.unwrap_or(0.0);
    ((1.0 + ratings_count).ln() * average_rating / 100.0).min(POPULARITY_CAP)
}

/// Bonus for candidates whose age matches the user's typical favorite.
///
/// `max(0, 0.1 - |candidate age - mean favorite age| / 100)`; 0.0 when
/// the candidate is undated or the user has no dated favorites. The mean
/// is taken over all favorites (undated ones contribute zero age),
/// matching the historical behavior of this computation.
pub fn recency_bonus(book: &BookRecord, user: &UserProfile, current_year: i32) -> f64 {
    let Some(book_year) = enrich::publication_year(book) else {
        return 0.0;
    };
    if user.favorite_books.is_empty() {
        return 0.0;
    }

    let dated_ages: Vec<f64> = user
        .favorite_books
        .iter()
        .filter_map(|f| enrich::publication_year(&f.book))
        .map(|year| (current_year - year) as f64)
        .collect();
    if dated_ages.is_empty() {
        return 0.0;
    }

    let mean_age = dated_ages.iter().sum::<f64>() / user.favorite_books.len() as f64;
    let age = (current_year - book_year) as f64;
    (0.1 - (age - mean_age).abs() / 100.0).max(0.0)
}
