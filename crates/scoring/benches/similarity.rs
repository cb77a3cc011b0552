//! Benchmarks for the scoring hot path
//!
//! Run with: cargo bench --package scoring
//!
//! Scoring is pure CPU work, so this benchmarks vector construction,
//! similarity, and a full ranking pass over a synthetic candidate set.

use catalog::{enrich, BookRecord, EnrichedBook};
use chrono::{Datelike, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use profile::{FavoriteBook, UserProfile};
use scoring::{build_book_vector, build_user_vector, rank, similarity, RankOptions};

fn synthetic_record(i: usize) -> BookRecord {
    let genres = ["Fantasy", "Mystery", "Science Fiction", "History", "Poetry"];
    BookRecord {
        id: format!("b{i}"),
        title: format!("Book {i}"),
        authors: vec![format!("Author {}", i % 23)],
        categories: vec![genres[i % genres.len()].to_string()],
        page_count: Some(150 + (i as u32 * 37) % 500),
        average_rating: Some(3.0 + (i % 20) as f64 / 10.0),
        ratings_count: (i as u32 * 17) % 5000,
        published_date: Some(format!("{}", 1970 + i % 55)),
        ..Default::default()
    }
}

fn synthetic_user(books: usize) -> UserProfile {
    let mut user = UserProfile::new("bench-user");
    for i in 0..books {
        user.favorite_books.push(FavoriteBook {
            book: synthetic_record(i),
            added_at: Utc::now(),
        });
    }
    user
}

fn bench_build_user_vector(c: &mut Criterion) {
    let user = synthetic_user(40);
    let year = Utc::now().year();

    c.bench_function("build_user_vector_40_books", |b| {
        b.iter(|| black_box(build_user_vector(black_box(&user), year)))
    });
}

fn bench_similarity(c: &mut Criterion) {
    let year = Utc::now().year();
    let user = synthetic_user(40);
    let user_vector = build_user_vector(&user, year);
    let book_vector = build_book_vector(&enrich::enrich(synthetic_record(7), year), year);

    c.bench_function("similarity", |b| {
        b.iter(|| black_box(similarity(black_box(&user_vector), black_box(&book_vector))))
    });
}

fn bench_rank_candidates(c: &mut Criterion) {
    let year = Utc::now().year();
    let user = synthetic_user(40);
    let user_vector = build_user_vector(&user, year);
    let candidates: Vec<EnrichedBook> = (100..300)
        .map(|i| enrich::enrich(synthetic_record(i), year))
        .collect();

    c.bench_function("rank_200_candidates", |b| {
        b.iter(|| {
            black_box(rank(
                black_box(&user_vector),
                candidates.clone(),
                &user,
                &RankOptions::default(),
                year,
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_build_user_vector,
    bench_similarity,
    bench_rank_candidates
);
criterion_main!(benches);
