//! Error types for catalog lookups.

use thiserror::Error;

/// Errors that can occur when talking to the book catalog.
///
/// A sub-query that fails with any of these is skipped by callers; only
/// the catalog collaborator itself produces them.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No volume exists with the given id
    #[error("Volume not found: {id}")]
    NotFound { id: String },

    /// The upstream catalog API failed or returned garbage
    #[error("Catalog upstream unavailable: {0}")]
    Upstream(String),

    /// A bounded per-call timeout elapsed
    #[error("Catalog call timed out")]
    Timeout,

    /// The query was malformed before any network call was made
    #[error("Invalid catalog query: {0}")]
    InvalidQuery(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
