//! # Catalog Crate
//!
//! Book metadata domain types, per-record enrichment, and the interface
//! to the external book catalog API.
//!
//! ## Main Components
//!
//! - **types**: [`BookRecord`], [`EnrichedBook`], [`AgeCategory`]
//! - **enrich**: pure derived signals (complexity, popularity, age
//!   bucket, word count, recency)
//! - **client**: [`CatalogClient`] async trait plus query/hit types
//! - **memory**: deterministic in-memory catalog for tests and demos
//! - **error**: [`CatalogError`]
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{enrich, CatalogClient, CatalogQuery, MemoryCatalog, SearchOrder};
//!
//! let catalog = MemoryCatalog::new(records);
//! let hits = catalog
//!     .search(&CatalogQuery::Subject("Mystery".into()), 15, SearchOrder::Relevance)
//!     .await?;
//! let book = enrich::enrich(hits[0].summary.clone(), 2026);
//! println!("{} complexity {}", book.record.title, book.complexity_score);
//! ```

// Public modules
pub mod client;
pub mod enrich;
pub mod error;
pub mod memory;
pub mod types;

// Re-export commonly used types for convenience
pub use client::{CatalogClient, CatalogQuery, SearchHit, SearchOrder};
pub use error::{CatalogError, Result};
pub use memory::MemoryCatalog;
pub use types::{AgeCategory, BookId, BookRecord, EnrichedBook, ImageLinks};
