//! # Scoring Crate
//!
//! The heuristic recommendation core: feature vectors, weighted
//! similarity, ranking bonuses, and explanations.
//!
//! ## Architecture
//! Scoring happens in stages:
//! 1. [`vector`] turns a profile or a candidate book into a
//!    [`FeatureVector`]
//! 2. [`similarity`] compares the two vectors
//! 3. [`ranker`] adds diversity/popularity/recency bonuses, filters,
//!    sorts, and truncates
//! 4. [`explain`] renders the same comparisons as human-readable text
//!
//! Everything here is pure and deterministic; the only time input is a
//! caller-seeded current year.
//!
//! ## Example Usage
//! ```ignore
//! use scoring::{build_user_vector, rank, RankOptions};
//!
//! let vector = build_user_vector(&user, 2026);
//! let ranked = rank(&vector, candidates, &user, &RankOptions::default(), 2026);
//! for item in &ranked {
//!     println!("{} {:.2}: {}", item.book.record.title, item.score, item.explanation);
//! }
//! ```

pub mod bonuses;
pub mod explain;
pub mod ranker;
pub mod similarity;
pub mod vector;

// Re-export main types
pub use explain::explain;
pub use ranker::{rank, RankOptions, ScoreBreakdown, ScoredBook, DEFAULT_COUNT, PRIMARY_FLOW_COUNT};
pub use similarity::similarity;
pub use vector::{
    bias_toward, build_book_vector, build_default_vector, build_user_vector, FeatureVector,
};
