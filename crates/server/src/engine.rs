//! # Recommendation Engine
//!
//! This module coordinates the entire recommendation flow:
//! 1. Load the user profile
//! 2. Build the user taste vector (biased toward a source book, if any)
//! 3. Retrieve candidates from the catalog
//! 4. Rank with similarity plus bonuses
//! 5. Record the session in the user's history
//! 6. Return top N recommendations
//!
//! The engine degrades rather than fails: a missing profile, a disabled
//! personalization flag, or any error inside the scored flow all fall
//! back to a plain catalog search. Only invalid input and store-level
//! failures on the initial profile read surface as errors.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Datelike, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use catalog::{enrich, BookRecord, CatalogClient, CatalogQuery, EnrichedBook, SearchOrder};
use profile::{
    HistoryEntry, HistoryItem, Interaction, InteractionKind, ProfileError, ProfileStore,
    UserProfile,
};
use retriever::CandidateRetriever;
use scoring::{
    bias_toward, build_book_vector, build_user_vector, rank, FeatureVector, RankOptions,
    DEFAULT_COUNT, PRIMARY_FLOW_COUNT,
};

/// Explanation attached to unpersonalized fallback results
const FALLBACK_EXPLANATION: &str = "Popular choice among readers";

/// Search term used when nothing is known about the user at all
const FALLBACK_TEXT_QUERY: &str = "bestsellers";

/// Errors surfaced at the engine boundary.
///
/// Catalog failures never appear here: every catalog-side problem
/// degrades to the fallback flow instead.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The operation requires an existing profile and none was found
    #[error("Profile not found for user {user_id}")]
    ProfileNotFound { user_id: String },

    /// The request was rejected before any collaborator was called
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The profile store failed outright
    #[error(transparent)]
    Store(#[from] ProfileError),
}

/// A single recommendation request
#[derive(Debug, Clone, Default)]
pub struct RecommendRequest {
    pub user_id: String,
    /// Bias the taste vector toward this book and exclude it from results
    pub source_book_id: Option<String>,
    /// Result count; defaults to [`EngineConfig::default_count`]
    pub count: Option<usize>,
    /// Steers the unpersonalized fallback search
    pub genre_hint: Option<String>,
}

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Personalized: scored against the user's taste vector
    Scored,
    /// Unpersonalized catalog search fallback
    Catalog,
}

/// Final recommendation returned to the caller
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub book: EnrichedBook,
    pub score: f64,
    pub explanation: String,
    pub origin: Origin,
}

/// Tuning knobs for the engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Result count when the request does not specify one
    pub default_count: usize,

    /// Result count the primary discovery surface asks for
    pub primary_flow_count: usize,

    /// How many top genres the retriever queries
    pub genre_fanout: usize,

    /// How many top authors the retriever queries
    pub author_fanout: usize,

    /// Bound on each individual catalog call
    pub call_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_count: DEFAULT_COUNT,
            primary_flow_count: PRIMARY_FLOW_COUNT,
            genre_fanout: 3,
            author_fanout: 2,
            call_timeout: Duration::from_secs(5),
        }
    }
}

/// Main engine that coordinates profile, catalog, retrieval and ranking
pub struct RecommendationEngine<C: CatalogClient + 'static, S: ProfileStore> {
    catalog: Arc<C>,
    store: Arc<S>,
    retriever: CandidateRetriever<C>,
    config: EngineConfig,
    /// Best-effort per-user vector cache. Never authoritative: the
    /// vector is rebuilt from the profile on every recommendation and
    /// the cached copy refreshed, last write wins.
    vector_cache: RwLock<HashMap<String, FeatureVector>>,
}

impl<C: CatalogClient + 'static, S: ProfileStore> RecommendationEngine<C, S> {
    /// Create an engine over the given collaborators
    pub fn new(catalog: Arc<C>, store: Arc<S>, config: EngineConfig) -> Self {
        let retriever = CandidateRetriever::new(Arc::clone(&catalog))
            .with_genre_fanout(config.genre_fanout)
            .with_author_fanout(config.author_fanout)
            .with_call_timeout(config.call_timeout);
        Self {
            catalog,
            store,
            retriever,
            config,
            vector_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Main entry point: get recommendations for a user.
    ///
    /// # Returns
    /// Recommendations sorted by score (highest first). Every upstream
    /// degradation still produces `Ok`: a missing profile or a broken
    /// scored flow yields catalog-fallback results, and an empty
    /// candidate pool yields an empty vec.
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn recommend(
        &self,
        request: RecommendRequest,
    ) -> Result<Vec<Recommendation>, EngineError> {
        if request.user_id.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "user id must not be blank".to_string(),
            ));
        }

        let start_time = Instant::now();
        let count = request.count.unwrap_or(self.config.default_count);

        let profile = match self.store.get_profile(&request.user_id).await? {
            Some(profile) => profile,
            None => {
                warn!(
                    "No profile for user {}, serving catalog fallback",
                    request.user_id
                );
                return Ok(self
                    .catalog_fallback(None, request.genre_hint.as_deref(), count)
                    .await);
            }
        };

        if !profile.ml_enabled {
            info!(
                "Personalization disabled for user {}, serving catalog fallback",
                request.user_id
            );
            return Ok(self
                .catalog_fallback(Some(&profile), request.genre_hint.as_deref(), count)
                .await);
        }

        let recommendations = self
            .scored_flow(&profile, request.source_book_id.as_deref(), count)
            .await;

        info!(
            "Returned {} recommendations for user {} in {:.2?}",
            recommendations.len(),
            request.user_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Record one user interaction and fold it into the cached vector.
    ///
    /// The interaction is appended to the profile's bounded log; the
    /// cached taste vector (built first if absent) gets the matching
    /// additive nudge so the next request reflects it immediately.
    #[instrument(skip(self, book), fields(book_id = %book.id))]
    pub async fn record_interaction(
        &self,
        user_id: &str,
        book: &BookRecord,
        kind: InteractionKind,
    ) -> Result<(), EngineError> {
        let profile = self
            .store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| EngineError::ProfileNotFound {
                user_id: user_id.to_string(),
            })?;

        let interaction = Interaction {
            book_id: book.id.clone(),
            kind,
            at: Utc::now(),
            genres: book.categories.clone(),
            authors: book.authors.clone(),
        };
        self.store.append_interaction(user_id, interaction).await?;

        let current_year = Utc::now().year();
        let mut cache = self.vector_cache.write().await;
        let vector = cache
            .entry(user_id.to_string())
            .or_insert_with(|| build_user_vector(&profile, current_year));
        vector.nudge(book, kind);

        info!("Recorded {:?} interaction for user {}", kind, user_id);
        Ok(())
    }

    /// Personalized flow: vector, retrieval, ranking, history.
    ///
    /// Infallible by construction: every sub-step degrades (biasing
    /// skipped, sub-queries dropped, history write logged) rather than
    /// propagating an error.
    async fn scored_flow(
        &self,
        profile: &UserProfile,
        source_book_id: Option<&str>,
        count: usize,
    ) -> Vec<Recommendation> {
        let current_year = Utc::now().year();

        let mut user_vector = build_user_vector(profile, current_year);
        if let Some(source_id) = source_book_id {
            match self.catalog.get_details(source_id).await {
                Ok(record) => {
                    let source = enrich::enrich(record, current_year);
                    let source_vector = build_book_vector(&source, current_year);
                    user_vector = bias_toward(&user_vector, &source_vector);
                }
                Err(err) => {
                    warn!(source_id, error = %err, "source book fetch failed, skipping bias");
                }
            }
        }

        self.vector_cache
            .write()
            .await
            .insert(profile.user_id.clone(), user_vector.clone());

        let candidates = self
            .retriever
            .get_candidates(&user_vector, source_book_id, current_year)
            .await;
        if candidates.is_empty() {
            info!("No candidates retrieved for user {}", profile.user_id);
            return Vec::new();
        }

        let options = RankOptions {
            count,
            ..RankOptions::default()
        };
        let ranked = rank(&user_vector, candidates, profile, &options, current_year);

        let entry = HistoryEntry {
            at: Utc::now(),
            items: ranked
                .iter()
                .map(|scored| HistoryItem {
                    book_id: scored.book.id().to_string(),
                    title: scored.book.record.title.clone(),
                    score: scored.score,
                    explanation: scored.explanation.clone(),
                })
                .collect(),
        };
        if let Err(err) = self.store.append_history(&profile.user_id, entry).await {
            warn!(user_id = %profile.user_id, error = %err, "history write failed");
        }

        ranked
            .into_iter()
            .map(|scored| Recommendation {
                book: scored.book,
                score: scored.score,
                explanation: scored.explanation,
                origin: Origin::Scored,
            })
            .collect()
    }

    /// Unpersonalized fallback: one plain catalog search, no scoring.
    ///
    /// Query preference: explicit genre hint, then the profile's first
    /// favorite genre, then a generic text search. Any failure yields an
    /// empty list.
    async fn catalog_fallback(
        &self,
        profile: Option<&UserProfile>,
        genre_hint: Option<&str>,
        count: usize,
    ) -> Vec<Recommendation> {
        let query = genre_hint
            .map(|g| CatalogQuery::Subject(g.to_string()))
            .or_else(|| {
                profile
                    .and_then(|p| p.favorite_genres.first())
                    .map(|g| CatalogQuery::Subject(g.clone()))
            })
            .unwrap_or_else(|| CatalogQuery::Text(FALLBACK_TEXT_QUERY.to_string()));

        let search = self.catalog.search(&query, count, SearchOrder::Relevance);
        let hits = match timeout(self.config.call_timeout, search).await {
            Ok(Ok(hits)) => hits,
            Ok(Err(err)) => {
                warn!(query = %query, error = %err, "fallback search failed");
                return Vec::new();
            }
            Err(_) => {
                warn!(query = %query, "fallback search timed out");
                return Vec::new();
            }
        };

        let current_year = Utc::now().year();
        hits.into_iter()
            .map(|hit| Recommendation {
                book: enrich::enrich(hit.summary, current_year),
                score: 0.0,
                explanation: FALLBACK_EXPLANATION.to_string(),
                origin: Origin::Catalog,
            })
            .collect()
    }
}
