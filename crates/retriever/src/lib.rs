//! Candidate Retriever - Catalog Fan-Out
//!
//! Turns a user taste vector into a pool of candidate books by querying
//! the external catalog along the user's strongest preferences:
//! - Subject queries for the user's top genres
//! - Author queries for the user's top authors
//!
//! ## Algorithm
//! 1. Take the top 3 genres and top 2 authors from the taste vector
//! 2. Run one catalog search per term, all concurrently, each under a
//!    bounded timeout
//! 3. Fetch full details for every hit, falling back to the search
//!    summary when the detail fetch fails
//! 4. Merge results in query order, first occurrence of an id wins
//! 5. Enrich every surviving record with derived signals
//!
//! A failed sub-query never fails the whole retrieval: its results are
//! simply absent from the pool. Callers that care can inspect the
//! per-query [`SubQueryReport`]s.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use catalog::{
    enrich, BookRecord, CatalogClient, CatalogError, CatalogQuery, EnrichedBook, SearchOrder,
};
use scoring::FeatureVector;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// Default number of genre sub-queries
const DEFAULT_GENRE_FANOUT: usize = 3;

/// Default number of author sub-queries
const DEFAULT_AUTHOR_FANOUT: usize = 2;

/// Default result cap per genre sub-query
const DEFAULT_PER_GENRE_RESULTS: usize = 15;

/// Default result cap per author sub-query
const DEFAULT_PER_AUTHOR_RESULTS: usize = 10;

/// Default per-call timeout for search and detail fetches
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one catalog sub-query: how many records it contributed,
/// or why it contributed none.
#[derive(Debug)]
pub struct SubQueryReport {
    pub query: CatalogQuery,
    pub outcome: Result<usize, CatalogError>,
}

/// Fans a taste vector out into concurrent catalog searches and merges
/// the results into a deduplicated, enriched candidate pool.
pub struct CandidateRetriever<C: CatalogClient + 'static> {
    /// Shared catalog collaborator
    client: Arc<C>,

    /// How many top genres to query
    genre_fanout: usize,

    /// How many top authors to query
    author_fanout: usize,

    /// Result cap per genre query
    per_genre_results: usize,

    /// Result cap per author query
    per_author_results: usize,

    /// Bound on each individual catalog call
    call_timeout: Duration,
}

impl<C: CatalogClient + 'static> CandidateRetriever<C> {
    /// Create a retriever over the given catalog client
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            genre_fanout: DEFAULT_GENRE_FANOUT,
            author_fanout: DEFAULT_AUTHOR_FANOUT,
            per_genre_results: DEFAULT_PER_GENRE_RESULTS,
            per_author_results: DEFAULT_PER_AUTHOR_RESULTS,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Configure how many top genres are queried (default: 3)
    pub fn with_genre_fanout(mut self, n: usize) -> Self {
        self.genre_fanout = n;
        self
    }

    /// Configure how many top authors are queried (default: 2)
    pub fn with_author_fanout(mut self, n: usize) -> Self {
        self.author_fanout = n;
        self
    }

    /// Configure the result cap per genre query (default: 15)
    pub fn with_per_genre_results(mut self, n: usize) -> Self {
        self.per_genre_results = n;
        self
    }

    /// Configure the result cap per author query (default: 10)
    pub fn with_per_author_results(mut self, n: usize) -> Self {
        self.per_author_results = n;
        self
    }

    /// Configure the per-call timeout (default: 5 s)
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Retrieve an enriched, deduplicated candidate pool for a taste
    /// vector.
    ///
    /// `exclude_id` drops a known book (typically the one the user is
    /// currently looking at) from the pool before enrichment.
    pub async fn get_candidates(
        &self,
        taste: &FeatureVector,
        exclude_id: Option<&str>,
        current_year: i32,
    ) -> Vec<EnrichedBook> {
        let (candidates, _) = self
            .get_candidates_with_report(taste, exclude_id, current_year)
            .await;
        candidates
    }

    /// Like [`get_candidates`](Self::get_candidates), but also returns
    /// the per-query outcomes for callers that want to surface partial
    /// failures.
    #[instrument(skip(self, taste), fields(catalog = self.client.name()))]
    pub async fn get_candidates_with_report(
        &self,
        taste: &FeatureVector,
        exclude_id: Option<&str>,
        current_year: i32,
    ) -> (Vec<EnrichedBook>, Vec<SubQueryReport>) {
        // Genre queries first, then author queries, both in taste-rank
        // order. Merge order (and with it dedup winners) follows this.
        let mut queries: Vec<(CatalogQuery, usize)> = Vec::new();
        for genre in taste.top_genres(self.genre_fanout) {
            queries.push((
                CatalogQuery::Subject(genre.to_string()),
                self.per_genre_results,
            ));
        }
        for author in taste.top_authors(self.author_fanout) {
            queries.push((
                CatalogQuery::Author(author.to_string()),
                self.per_author_results,
            ));
        }

        if queries.is_empty() {
            debug!("taste vector has no genres or authors, nothing to retrieve");
            return (Vec::new(), Vec::new());
        }

        let mut tasks = JoinSet::new();
        for (idx, (query, max_results)) in queries.iter().cloned().enumerate() {
            let client = Arc::clone(&self.client);
            let call_timeout = self.call_timeout;
            tasks.spawn(async move {
                let outcome =
                    run_sub_query(client.as_ref(), &query, max_results, call_timeout).await;
                (idx, query, outcome)
            });
        }

        // Collect completions back into query order so the merge below
        // is deterministic regardless of task scheduling.
        let mut slots: Vec<Option<(CatalogQuery, Result<Vec<BookRecord>, CatalogError>)>> =
            (0..queries.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, query, outcome)) => slots[idx] = Some((query, outcome)),
                Err(err) => warn!("candidate sub-query task failed to run: {err}"),
            }
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates = Vec::new();
        let mut reports = Vec::new();
        for (query, outcome) in slots.into_iter().flatten() {
            match outcome {
                Ok(records) => {
                    let fetched = records.len();
                    for record in records {
                        if exclude_id.is_some_and(|id| id == record.id) {
                            continue;
                        }
                        if !seen.insert(record.id.clone()) {
                            continue;
                        }
                        candidates.push(enrich::enrich(record, current_year));
                    }
                    reports.push(SubQueryReport {
                        query,
                        outcome: Ok(fetched),
                    });
                }
                Err(err) => {
                    warn!(query = %query, error = %err, "candidate sub-query failed, skipping");
                    reports.push(SubQueryReport {
                        query,
                        outcome: Err(err),
                    });
                }
            }
        }

        debug!(
            "Retrieved {} candidates from {} sub-queries",
            candidates.len(),
            reports.len()
        );
        (candidates, reports)
    }
}

/// Run one catalog search and resolve every hit to a full record.
///
/// Detail fetch failures degrade to the search summary; only the search
/// itself failing (or timing out) fails the sub-query.
async fn run_sub_query<C: CatalogClient + ?Sized>(
    client: &C,
    query: &CatalogQuery,
    max_results: usize,
    call_timeout: Duration,
) -> Result<Vec<BookRecord>, CatalogError> {
    let search = client.search(query, max_results, SearchOrder::Relevance);
    let hits = match timeout(call_timeout, search).await {
        Ok(result) => result?,
        Err(_) => return Err(CatalogError::Timeout),
    };

    let mut records = Vec::with_capacity(hits.len());
    for hit in hits {
        let record = match timeout(call_timeout, client.get_details(&hit.id)).await {
            Ok(Ok(details)) => details,
            Ok(Err(err)) => {
                debug!(id = %hit.id, error = %err, "detail fetch failed, using search summary");
                hit.summary
            }
            Err(_) => {
                debug!(id = %hit.id, "detail fetch timed out, using search summary");
                hit.summary
            }
        };
        records.push(record);
    }
    Ok(records)
}
