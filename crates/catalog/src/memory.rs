//! In-memory catalog backed by a fixed set of records.
//!
//! Used by the demo binary and by tests that need to exercise the
//! retrieval path deterministically, including its failure handling:
//! individual search terms and detail fetches can be set to fail.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::client::{CatalogClient, CatalogQuery, SearchHit, SearchOrder};
use crate::enrich;
use crate::error::{CatalogError, Result};
use crate::types::BookRecord;

/// Catalog implementation over an in-memory record list.
///
/// Search semantics are intentionally simple: case-insensitive substring
/// match on categories (subject), authors (author), or title/description
/// (text). Results come back in insertion order, so tests stay
/// deterministic.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    records: Vec<BookRecord>,
    /// Search terms that fail with an upstream error (lowercased)
    failing_terms: HashSet<String>,
    /// Volume ids whose detail fetch fails
    failing_details: HashSet<String>,
}

impl MemoryCatalog {
    pub fn new(records: Vec<BookRecord>) -> Self {
        Self {
            records,
            failing_terms: HashSet::new(),
            failing_details: HashSet::new(),
        }
    }

    /// Make any search whose term matches `term` fail with an upstream
    /// error. For exercising the skip-and-continue retrieval policy.
    pub fn fail_term(mut self, term: impl Into<String>) -> Self {
        self.failing_terms.insert(term.into().to_lowercase());
        self
    }

    /// Make `get_details` fail for a volume id, forcing callers onto the
    /// summary-record fallback.
    pub fn fail_details(mut self, id: impl Into<String>) -> Self {
        self.failing_details.insert(id.into());
        self
    }

    fn matches(record: &BookRecord, query: &CatalogQuery) -> bool {
        match query {
            CatalogQuery::Subject(subject) => {
                let needle = subject.to_lowercase();
                record
                    .categories
                    .iter()
                    .any(|c| c.to_lowercase().contains(&needle))
            }
            CatalogQuery::Author(author) => {
                let needle = author.to_lowercase();
                record
                    .authors
                    .iter()
                    .any(|a| a.to_lowercase().contains(&needle))
            }
            CatalogQuery::Text(text) => {
                let needle = text.to_lowercase();
                record.title.to_lowercase().contains(&needle)
                    || record
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
        }
    }

    fn term_of(query: &CatalogQuery) -> &str {
        match query {
            CatalogQuery::Subject(s) => s,
            CatalogQuery::Author(a) => a,
            CatalogQuery::Text(t) => t,
        }
    }
}

#[async_trait]
impl CatalogClient for MemoryCatalog {
    async fn search(
        &self,
        query: &CatalogQuery,
        max_results: usize,
        order: SearchOrder,
    ) -> Result<Vec<SearchHit>> {
        let term = Self::term_of(query);
        if term.trim().is_empty() {
            return Err(CatalogError::InvalidQuery("empty search term".to_string()));
        }
        if self.failing_terms.contains(&term.to_lowercase()) {
            return Err(CatalogError::Upstream(format!(
                "injected failure for term '{term}'"
            )));
        }

        let mut matched: Vec<&BookRecord> = self
            .records
            .iter()
            .filter(|r| Self::matches(r, query))
            .collect();
        if order == SearchOrder::Newest {
            // Stable sort keeps insertion order inside one year;
            // undated records sink to the end
            matched.sort_by_key(|r| {
                std::cmp::Reverse(enrich::publication_year(r).unwrap_or(i32::MIN))
            });
        }

        let hits = matched
            .into_iter()
            .take(max_results)
            .map(|r| SearchHit {
                id: r.id.clone(),
                summary: r.clone(),
            })
            .collect();
        Ok(hits)
    }

    async fn get_details(&self, id: &str) -> Result<BookRecord> {
        if self.failing_details.contains(id) {
            return Err(CatalogError::Upstream(format!(
                "injected detail failure for '{id}'"
            )));
        }
        self.records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    fn name(&self) -> &str {
        "memory-catalog"
    }
}
