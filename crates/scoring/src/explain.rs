//! Human-readable recommendation explanations.
//!
//! Built from the same feature comparisons the scorer uses, so the text
//! never disagrees with the score. Pure and deterministic: the same
//! vectors and breakdown always produce the same clauses in the same
//! order.

use crate::ranker::ScoreBreakdown;
use crate::vector::FeatureVector;

/// Minimum user weight for a genre/author to be worth mentioning
const MENTION_THRESHOLD: f64 = 0.1;

/// Fallback clause when nothing specific applies
const GENERIC_CLAUSE: &str = "Recommended based on your reading history";

/// Generate explanation clauses for one scored candidate.
///
/// Each clause is gated by a threshold; the order is fixed. Callers join
/// the clauses with ". " for display.
pub fn explain(
    user: &FeatureVector,
    book: &FeatureVector,
    breakdown: &ScoreBreakdown,
) -> Vec<String> {
    let mut clauses = Vec::new();

    // Shared genres the user actually cares about
    let matching_genres: Vec<&str> = user
        .genres
        .iter()
        .filter(|(genre, weight)| **weight > MENTION_THRESHOLD && book.genres.contains_key(*genre))
        .map(|(genre, _)| genre.as_str())
        .take(2)
        .collect();
    if !matching_genres.is_empty() {
        clauses.push(format!(
            "Matches your interest in {}",
            matching_genres.join(" and ")
        ));
    }

    // Shared authors above the same threshold
    let matching_authors: Vec<&str> = user
        .authors
        .iter()
        .filter(|(author, weight)| {
            **weight > MENTION_THRESHOLD && book.authors.contains_key(*author)
        })
        .map(|(author, _)| author.as_str())
        .take(2)
        .collect();
    match matching_authors.as_slice() {
        [] => {}
        [author] => clauses.push(format!("By {author}, an author you've enjoyed")),
        authors => clauses.push(format!(
            "By {}, authors you've enjoyed",
            authors.join(" and ")
        )),
    }

    if book.rating >= 4.0 {
        clauses.push(format!("Highly rated ({:.1}/5)", book.rating));
    }

    if (user.complexity - book.complexity).abs() < 0.5 {
        clauses.push("Matches your preferred reading level".to_string());
    }

    if (user.page_length - book.page_length).abs() < 100.0 {
        clauses.push("Good length for your preferences".to_string());
    }

    if breakdown.diversity_bonus > 0.1 {
        clauses.push("Explores new genres you might enjoy".to_string());
    }

    if breakdown.popularity_bonus > 0.1 {
        clauses.push("Popular among readers with similar tastes".to_string());
    }

    if clauses.is_empty() {
        clauses.push(GENERIC_CLAUSE.to_string());
    }
    clauses
}
