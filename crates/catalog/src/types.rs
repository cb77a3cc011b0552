//! Core domain types for the book catalog.
//!
//! A [`BookRecord`] is the raw metadata shape the external catalog API
//! returns. [`EnrichedBook`] bundles a record with the derived signals
//! the scoring layer works with; enrichment is a pure function of the
//! record (see [`crate::enrich`]) and is recomputed on demand, never
//! treated as authoritative stored data.

use serde::{Deserialize, Serialize};

/// Opaque, externally assigned volume identifier
pub type BookId = String;

/// Raw book metadata as the catalog collaborator returns it.
///
/// Every field other than `id` and `title` may be missing or empty in
/// real catalog payloads, so the shape leans on `Option` and empty
/// collections rather than sentinel values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Ordered author list as the catalog reports it
    #[serde(default)]
    pub authors: Vec<String>,
    /// Genre tags; treated as a set, order only matters for display
    #[serde(default)]
    pub categories: Vec<String>,
    /// Partial date string; only the leading year is relied upon
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    /// 0.0 to 5.0 when present
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub ratings_count: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
}

/// Cover image URLs from the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub small_thumbnail: Option<String>,
}

/// Age bucket derived from publication year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeCategory {
    /// No usable publication date
    Unknown,
    /// Published within the last 2 years
    New,
    /// Within 10 years
    Recent,
    /// Within 25 years
    Modern,
    /// Within 50 years
    Classic,
    /// Older than 50 years
    Vintage,
}

/// A [`BookRecord`] with its derived signals computed once.
///
/// Produced by [`crate::enrich::enrich`]; candidates flowing through the
/// retriever and ranker are always enriched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedBook {
    pub record: BookRecord,
    /// ratings_count x average_rating, 0.0 when the rating is absent
    pub popularity_score: f64,
    pub age_category: AgeCategory,
    /// Rough estimate: page_count x 275
    pub word_count: u32,
    /// 0 to 5, see [`crate::enrich::complexity_score`]
    pub complexity_score: u8,
}

impl EnrichedBook {
    /// Volume id of the underlying record
    pub fn id(&self) -> &str {
        &self.record.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_catalog_payload() {
        // Field shape as the upstream catalog API sends it
        let payload = r#"{
            "id": "vol-9",
            "title": "The Quiet Harbor",
            "authors": ["June Park"],
            "categories": ["Mystery"],
            "publishedDate": "2023-04-11",
            "pageCount": 288,
            "averageRating": 4.3,
            "ratingsCount": 1400,
            "imageLinks": { "thumbnail": "http://example.test/t.png" }
        }"#;

        let record: BookRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.id, "vol-9");
        assert_eq!(record.page_count, Some(288));
        assert_eq!(record.ratings_count, 1400);
        assert!(record.image_links.unwrap().thumbnail.is_some());
    }

    #[test]
    fn test_sparse_payload_fills_defaults() {
        let record: BookRecord =
            serde_json::from_str(r#"{ "id": "vol-1", "title": "Untitled" }"#).unwrap();
        assert!(record.authors.is_empty());
        assert_eq!(record.page_count, None);
        assert_eq!(record.ratings_count, 0);
    }
}
