//! Per-record enrichment: the derived signals scoring runs on.
//!
//! All of these are pure functions of a [`BookRecord`] and (where ages
//! are involved) a caller-supplied current year. The engine seeds the
//! year once per request so a single ranking pass never observes two
//! different "now" values.

use crate::types::{AgeCategory, BookRecord, EnrichedBook};

/// Genres that push a book toward the complex end of the scale.
/// Matched as case-insensitive substrings of the joined category list.
const COMPLEX_GENRES: [&str; 4] = ["philosophy", "science", "academic", "technical"];

/// Estimated words per page
const WORDS_PER_PAGE: u32 = 275;

/// Extract the publication year from a partial date string.
///
/// Catalog dates come in "2019", "2019-05", or "2019-05-17" forms; only
/// the leading four digits are trusted.
pub fn publication_year(book: &BookRecord) -> Option<i32> {
    let date = book.published_date.as_deref()?;
    let year: String = date.chars().take_while(|c| c.is_ascii_digit()).collect();
    if year.len() == 4 { year.parse().ok() } else { None }
}

/// Popularity as ratings volume weighted by quality.
///
/// 0.0 when the average rating is absent, regardless of count.
pub fn popularity_score(book: &BookRecord) -> f64 {
    book.ratings_count as f64 * book.average_rating.unwrap_or(0.0)
}

/// Bucket a book by its age relative to `current_year`.
pub fn age_category(book: &BookRecord, current_year: i32) -> AgeCategory {
    let Some(year) = publication_year(book) else {
        return AgeCategory::Unknown;
    };
    let age = current_year - year;
    if age <= 2 {
        AgeCategory::New
    } else if age <= 10 {
        AgeCategory::Recent
    } else if age <= 25 {
        AgeCategory::Modern
    } else if age <= 50 {
        AgeCategory::Classic
    } else {
        AgeCategory::Vintage
    }
}

/// Rough word count estimate, 0 when page count is absent.
pub fn word_count(book: &BookRecord) -> u32 {
    book.page_count.unwrap_or(0) * WORDS_PER_PAGE
}

/// Heuristic reading-complexity score in 0..=5.
///
/// ## Algorithm
/// - Page count contributes the highest matching threshold only:
///   +3 over 500 pages, +2 over 300, +1 over 150.
/// - +2 if any category matches the complex-genre list.
/// - +1 if the average rating is above 4.0.
/// - Capped at 5 (a 600-page, highly rated science book would otherwise
///   reach 6).
pub fn complexity_score(book: &BookRecord) -> u8 {
    let mut score = 0u8;

    if let Some(pages) = book.page_count {
        if pages > 500 {
            score += 3;
        } else if pages > 300 {
            score += 2;
        } else if pages > 150 {
            score += 1;
        }
    }

    let joined = book.categories.join(" ").to_lowercase();
    if COMPLEX_GENRES.iter().any(|g| joined.contains(g)) {
        score += 2;
    }

    if book.average_rating.is_some_and(|r| r > 4.0) {
        score += 1;
    }

    score.min(5)
}

/// Recency preference signal: newer books score higher, floor at 0.
///
/// `max(0, 5 - age / 10)`, 0.0 when the record has no usable date.
pub fn recency_score(book: &BookRecord, current_year: i32) -> f64 {
    match publication_year(book) {
        Some(year) => (5.0 - (current_year - year) as f64 / 10.0).max(0.0),
        None => 0.0,
    }
}

/// The single canonical enrichment step.
///
/// Every candidate entering the scoring pipeline passes through here
/// exactly once per request.
pub fn enrich(record: BookRecord, current_year: i32) -> EnrichedBook {
    EnrichedBook {
        popularity_score: popularity_score(&record),
        age_category: age_category(&record, current_year),
        word_count: word_count(&record),
        complexity_score: complexity_score(&record),
        record,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(pages: Option<u32>, categories: &[&str], rating: Option<f64>) -> BookRecord {
        BookRecord {
            id: "b1".to_string(),
            title: "Test Book".to_string(),
            page_count: pages,
            categories: categories.iter().map(|s| s.to_string()).collect(),
            average_rating: rating,
            ..Default::default()
        }
    }

    #[test]
    fn test_complexity_caps_at_five() {
        // 600 pages (+3), Science (+2), 4.5 rating (+1) would be 6 uncapped
        let b = book(Some(600), &["Science"], Some(4.5));
        assert_eq!(complexity_score(&b), 5);
    }

    #[test]
    fn test_complexity_floor() {
        let b = book(Some(100), &[], Some(3.0));
        assert_eq!(complexity_score(&b), 0);
    }

    #[test]
    fn test_complexity_page_thresholds_exclusive() {
        // Only the highest matching threshold applies
        assert_eq!(complexity_score(&book(Some(200), &[], None)), 1);
        assert_eq!(complexity_score(&book(Some(350), &[], None)), 2);
        assert_eq!(complexity_score(&book(Some(501), &[], None)), 3);
    }

    #[test]
    fn test_complex_genre_is_substring_match() {
        // "Computer Science" contains "science"
        let b = book(None, &["Computer Science"], None);
        assert_eq!(complexity_score(&b), 2);
    }

    #[test]
    fn test_publication_year_parses_partial_dates() {
        let mut b = book(None, &[], None);
        b.published_date = Some("2019-05-17".to_string());
        assert_eq!(publication_year(&b), Some(2019));

        b.published_date = Some("1954".to_string());
        assert_eq!(publication_year(&b), Some(1954));

        b.published_date = Some("n.d.".to_string());
        assert_eq!(publication_year(&b), None);
    }

    #[test]
    fn test_age_category_buckets() {
        let mut b = book(None, &[], None);
        let cases = [
            ("2025", AgeCategory::New),
            ("2018", AgeCategory::Recent),
            ("2005", AgeCategory::Modern),
            ("1980", AgeCategory::Classic),
            ("1950", AgeCategory::Vintage),
        ];
        for (date, expected) in cases {
            b.published_date = Some(date.to_string());
            assert_eq!(age_category(&b, 2026), expected, "date {date}");
        }

        b.published_date = None;
        assert_eq!(age_category(&b, 2026), AgeCategory::Unknown);
    }

    #[test]
    fn test_popularity_zero_without_rating() {
        let mut b = book(None, &[], None);
        b.ratings_count = 1000;
        assert_eq!(popularity_score(&b), 0.0);

        b.average_rating = Some(4.0);
        assert_eq!(popularity_score(&b), 4000.0);
    }

    #[test]
    fn test_recency_score_floors_at_zero() {
        let mut b = book(None, &[], None);
        b.published_date = Some("1900".to_string());
        assert_eq!(recency_score(&b, 2026), 0.0);

        b.published_date = Some("2026".to_string());
        assert_eq!(recency_score(&b, 2026), 5.0);
    }

    #[test]
    fn test_enrich_computes_all_signals() {
        let mut b = book(Some(400), &["Philosophy"], Some(4.2));
        b.published_date = Some("2020".to_string());
        b.ratings_count = 50;

        let enriched = enrich(b, 2026);
        assert_eq!(enriched.complexity_score, 5); // 2 pages + 2 genre + 1 rating
        assert_eq!(enriched.word_count, 110_000);
        assert_eq!(enriched.age_category, AgeCategory::Recent);
        assert!((enriched.popularity_score - 210.0).abs() < 1e-9);
    }
}
