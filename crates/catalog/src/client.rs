//! Catalog lookup interface.
//!
//! The external book catalog (search + per-volume details) is the only
//! network collaborator the scoring core consumes. Abstracting it behind
//! a trait lets the engine run against a real HTTP client in production
//! and [`crate::memory::MemoryCatalog`] in tests and demos without the
//! scoring logic noticing.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::BookRecord;

/// A single catalog search term.
///
/// Mirrors the filters the upstream API supports: subject (genre),
/// author, and plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    Subject(String),
    Author(String),
    Text(String),
}

impl std::fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogQuery::Subject(s) => write!(f, "subject:{s}"),
            CatalogQuery::Author(a) => write!(f, "inauthor:{a}"),
            CatalogQuery::Text(t) => write!(f, "{t}"),
        }
    }
}

/// Result ordering hint forwarded to the upstream catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    /// Upstream relevance ranking (the default)
    #[default]
    Relevance,
    /// Most recently published first
    Newest,
}

/// One search result: the volume id plus the summary record that came
/// with it. The summary is a usable (if sparser) fallback when the
/// per-volume detail fetch fails.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub summary: BookRecord,
}

/// Async interface to the external book catalog.
///
/// # Design Notes
///
/// - An empty result set is `Ok(vec![])`, never an error; callers treat
///   it as zero candidates.
/// - Implementations own their own pagination and rate limiting; callers
///   only pass a `max_results` hint.
/// - Per-volume detail failures are surfaced so callers can degrade to
///   the summary record instead of dropping the hit.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search the catalog, returning at most `max_results` hits in the
    /// requested order.
    async fn search(
        &self,
        query: &CatalogQuery,
        max_results: usize,
        order: SearchOrder,
    ) -> Result<Vec<SearchHit>>;

    /// Fetch the full record for a volume id.
    async fn get_details(&self, id: &str) -> Result<BookRecord>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
