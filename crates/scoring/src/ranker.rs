//! Candidate ranking: similarity plus bonuses, filtered and sorted.
//!
//! Candidates are scored independently (and in parallel), then filtered,
//! stably sorted by descending total score, and truncated. Given the
//! same inputs the ranker always produces the same order and scores;
//! wall-clock only enters through the caller-seeded current year.

use catalog::EnrichedBook;
use profile::UserProfile;
use rayon::prelude::*;
use tracing::debug;

use crate::bonuses::{diversity_bonus, popularity_bonus, recency_bonus};
use crate::explain::explain;
use crate::similarity::similarity;
use crate::vector::{build_book_vector, FeatureVector};

/// Default result count for general recommendation requests
pub const DEFAULT_COUNT: usize = 10;
/// Result count for the primary UI flow
pub const PRIMARY_FLOW_COUNT: usize = 6;

/// Knobs for one ranking pass.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Maximum results returned
    pub count: usize,
    /// Drop candidates already in favorites or any reading list
    pub exclude_read: bool,
    /// Apply the diversity bonus
    pub diversify: bool,
    /// Apply the popularity bonus
    pub include_popular: bool,
    /// Drop candidates whose raw similarity falls below this floor
    pub min_similarity: Option<f64>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            exclude_read: true,
            diversify: true,
            include_popular: true,
            min_similarity: None,
        }
    }
}

/// The individual terms behind a candidate's total score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreBreakdown {
    pub similarity: f64,
    pub diversity_bonus: f64,
    pub popularity_bonus: f64,
    pub recency_bonus: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.similarity + self.diversity_bonus + self.popularity_bonus + self.recency_bonus
    }
}

/// One ranked candidate with its score and justification.
#[derive(Debug, Clone)]
pub struct ScoredBook {
    pub book: EnrichedBook,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub explanation: String,
}

/// Score, filter, sort, and truncate a candidate set.
///
/// ## Algorithm
/// 1. Score every candidate in parallel (order preserving): similarity
///    plus diversity, popularity, and recency bonuses, each individually
///    capped.
/// 2. Drop candidates below the optional similarity floor.
/// 3. With `exclude_read`, drop candidates the user has already seen
///    (favorites or any reading-list entry, regardless of status).
/// 4. Stable sort by total score descending; ties keep candidate order.
/// 5. Truncate to `count`.
pub fn rank(
    user_vector: &FeatureVector,
    candidates: Vec<EnrichedBook>,
    user: &UserProfile,
    options: &RankOptions,
    current_year: i32,
) -> Vec<ScoredBook> {
    let candidate_count = candidates.len();

    let mut scored: Vec<ScoredBook> = candidates
        .into_par_iter()
        .map(|book| score_candidate(user_vector, book, user, options, current_year))
        .collect();

    if let Some(floor) = options.min_similarity {
        scored.retain(|s| s.breakdown.similarity > floor);
    }

    if options.exclude_read {
        let seen = user.seen_ids();
        scored.retain(|s| !seen.contains(s.book.id()));
    }

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(options.count);

    debug!(
        "Ranked {} of {} candidates for user {}",
        scored.len(),
        candidate_count,
        user.user_id
    );
    scored
}

fn score_candidate(
    user_vector: &FeatureVector,
    book: EnrichedBook,
    user: &UserProfile,
    options: &RankOptions,
    current_year: i32,
) -> ScoredBook {
    let book_vector = build_book_vector(&book, current_year);

    let breakdown = ScoreBreakdown {
        similarity: similarity(user_vector, &book_vector),
        diversity_bonus: if options.diversify {
            diversity_bonus(&book.record, user)
        } else {
            0.0
        },
        popularity_bonus: if options.include_popular {
            popularity_bonus(&book.record)
        } else {
            0.0
        },
        recency_bonus: recency_bonus(&book.record, user, current_year),
    };

    let explanation = explain(user_vector, &book_vector, &breakdown).join(". ");

    ScoredBook {
        score: breakdown.total(),
        breakdown,
        explanation,
        book,
    }
}
