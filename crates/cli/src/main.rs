use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use std::time::Instant;

use catalog::{BookRecord, CatalogClient, MemoryCatalog};
use profile::{
    FavoriteBook, InteractionKind, ListEntry, MemoryProfileStore, ProfileStore, ReadingList,
    ReadingStatus, UserProfile,
};
use server::{EngineConfig, Origin, Recommendation, RecommendRequest, RecommendationEngine};

/// ShelfRecs - Book Recommendation Engine
#[derive(Parser)]
#[command(name = "shelf-recs")]
#[command(about = "Book recommendation engine over a seeded demo catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get book recommendations for a reader
    Recommend {
        /// Reader ID to recommend for
        #[arg(long, default_value = "ana")]
        user_id: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "6")]
        count: usize,

        /// Bias recommendations toward this book ID
        #[arg(long)]
        source: Option<String>,

        /// Genre hint for unpersonalized fallback results
        #[arg(long)]
        genre: Option<String>,
    },

    /// Record an interaction and show how it shifts recommendations
    Interact {
        /// Reader ID the interaction belongs to
        #[arg(long, default_value = "ana")]
        user_id: String,

        /// Book ID being interacted with
        #[arg(long)]
        book_id: String,

        /// One of: favorite, read, added-to-list, search
        #[arg(long, default_value = "favorite")]
        kind: String,
    },

    /// Show a reader's profile
    Profile {
        /// Reader ID to display
        #[arg(long, default_value = "ana")]
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let catalog = Arc::new(seed_catalog());
    let store = Arc::new(MemoryProfileStore::new());
    store.seed([demo_reader()]).await;
    let engine = RecommendationEngine::new(
        Arc::clone(&catalog),
        Arc::clone(&store),
        EngineConfig::default(),
    );

    match cli.command {
        Commands::Recommend {
            user_id,
            count,
            source,
            genre,
        } => handle_recommend(&engine, user_id, count, source, genre).await?,
        Commands::Interact {
            user_id,
            book_id,
            kind,
        } => handle_interact(&engine, catalog.as_ref(), user_id, book_id, kind).await?,
        Commands::Profile { user_id } => handle_profile(store.as_ref(), user_id).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    engine: &RecommendationEngine<MemoryCatalog, MemoryProfileStore>,
    user_id: String,
    count: usize,
    source: Option<String>,
    genre: Option<String>,
) -> Result<()> {
    let start = Instant::now();
    let recommendations = engine
        .recommend(RecommendRequest {
            user_id: user_id.clone(),
            source_book_id: source,
            count: Some(count),
            genre_hint: genre,
        })
        .await?;
    let elapsed = start.elapsed();

    print_recommendations(&user_id, &recommendations);
    println!("{} Generated in {:?}", "✓".green(), elapsed);
    Ok(())
}

/// Handle the 'interact' command
async fn handle_interact(
    engine: &RecommendationEngine<MemoryCatalog, MemoryProfileStore>,
    catalog: &MemoryCatalog,
    user_id: String,
    book_id: String,
    kind: String,
) -> Result<()> {
    let kind = parse_kind(&kind)?;
    let book = catalog
        .get_details(&book_id)
        .await
        .map_err(|_| anyhow!("Book '{}' not found in the demo catalog", book_id))?;

    engine.record_interaction(&user_id, &book, kind).await?;
    println!(
        "{} Recorded {:?} interaction with {}",
        "✓".green(),
        kind,
        book.title.bold()
    );

    // Show the effect right away
    let recommendations = engine
        .recommend(RecommendRequest {
            user_id: user_id.clone(),
            ..Default::default()
        })
        .await?;
    print_recommendations(&user_id, &recommendations);
    Ok(())
}

/// Handle the 'profile' command
async fn handle_profile(store: &MemoryProfileStore, user_id: String) -> Result<()> {
    let profile = store
        .get_profile(&user_id)
        .await?
        .ok_or_else(|| anyhow!("Reader '{}' not found", user_id))?;

    print!("{}", format!("Reader: {}\n", profile.user_id).bold().blue());
    print!(
        "{}Personalization: {}\n",
        "• ".green(),
        if profile.ml_enabled { "on" } else { "off" }
    );
    print!(
        "{}Favorite genres: {}\n",
        "• ".green(),
        profile.favorite_genres.join(", ")
    );

    print!("Favorite books:\n");
    for favorite in &profile.favorite_books {
        print!(
            "  - {} by {}\n",
            favorite.book.title,
            favorite.book.authors.join(", ")
        );
    }

    print!("Reading lists:\n");
    for list in &profile.reading_lists {
        print!("  {} ({} books)\n", list.name, list.books.len());
        for entry in &list.books {
            print!("    - {} [{:?}]\n", entry.book.title, entry.status);
        }
    }

    print!(
        "{}Logged interactions: {}\n",
        "• ".cyan(),
        profile.ml_learning.interactions.len()
    );
    print!(
        "{}Recommendation sessions: {}\n",
        "• ".cyan(),
        profile.recommendation_history.len()
    );
    Ok(())
}

fn parse_kind(kind: &str) -> Result<InteractionKind> {
    match kind {
        "favorite" => Ok(InteractionKind::Favorite),
        "read" => Ok(InteractionKind::Read),
        "added-to-list" => Ok(InteractionKind::AddedToList),
        "search" => Ok(InteractionKind::Search),
        other => Err(anyhow!(
            "Unknown interaction kind '{}' (expected favorite, read, added-to-list or search)",
            other
        )),
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(user_id: &str, recommendations: &[Recommendation]) {
    print!(
        "{}",
        format!("Recommendations for {}:\n", user_id).bold().blue()
    );
    if recommendations.is_empty() {
        println!("  (nothing found)");
        return;
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        let record = &rec.book.record;
        let origin_flag = match rec.origin {
            Origin::Scored => "personalized".cyan(),
            Origin::Catalog => "popular".yellow(),
        };
        println!(
            "{}. {} by {} [{}] - Score: {:.2} ({})",
            (rank + 1).to_string().green(),
            record.title.bold(),
            record.authors.join(", "),
            record.categories.join(", "),
            rec.score,
            origin_flag
        );
        println!("   {}", rec.explanation);
    }
}

/// Seed catalog: a small shelf spanning the demo reader's tastes plus
/// a few deliberate outliers.
fn seed_catalog() -> MemoryCatalog {
    MemoryCatalog::new(vec![
        seed_book(
            "fan-1",
            "The Ember Crown",
            &["Fantasy"],
            &["Nadia Ortiz"],
            "2019",
            412,
            4.4,
            1800,
        ),
        seed_book(
            "fan-2",
            "Salt and Sorcery",
            &["Fantasy", "Adventure"],
            &["Nadia Ortiz"],
            "2022",
            368,
            4.2,
            950,
        ),
        seed_book(
            "fan-3",
            "The Glass Harbor",
            &["Fantasy"],
            &["Rowan Vale"],
            "2021",
            297,
            3.9,
            610,
        ),
        seed_book(
            "mys-1",
            "Cold Case at Dunmore",
            &["Mystery"],
            &["June Park"],
            "2020",
            324,
            4.0,
            2300,
        ),
        seed_book(
            "mys-2",
            "The Quiet Harbor",
            &["Mystery", "Thriller"],
            &["June Park"],
            "2023",
            288,
            4.3,
            1400,
        ),
        seed_book(
            "sci-1",
            "Starfall Protocol",
            &["Science Fiction"],
            &["Ada Chen"],
            "2018",
            455,
            4.1,
            3100,
        ),
        seed_book(
            "phi-1",
            "On Stillness",
            &["Philosophy"],
            &["Marcus Webb"],
            "2015",
            210,
            4.5,
            760,
        ),
        seed_book(
            "rom-1",
            "Letters from Positano",
            &["Romance"],
            &["Elena Russo"],
            "2024",
            264,
            3.8,
            540,
        ),
        seed_book(
            "cls-1",
            "The Long Meadow",
            &["Fiction", "Classics"],
            &["Harold Finch"],
            "1962",
            389,
            4.6,
            8800,
        ),
        seed_book(
            "chd-1",
            "Mole and the Moon Kite",
            &["Children's Fiction"],
            &["Pip Larsen"],
            "2017",
            48,
            4.7,
            420,
        ),
    ])
}

#[allow(clippy::too_many_arguments)]
fn seed_book(
    id: &str,
    title: &str,
    genres: &[&str],
    authors: &[&str],
    published: &str,
    pages: u32,
    rating: f64,
    ratings_count: u32,
) -> BookRecord {
    BookRecord {
        id: id.to_string(),
        title: title.to_string(),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        categories: genres.iter().map(|g| g.to_string()).collect(),
        published_date: Some(published.to_string()),
        page_count: Some(pages),
        average_rating: Some(rating),
        ratings_count,
        ..Default::default()
    }
}

/// Demo reader: a fantasy regular who just finished a mystery.
fn demo_reader() -> UserProfile {
    let mut ana = UserProfile::new("ana");
    ana.favorite_genres.push("Fantasy".to_string());
    ana.favorite_books.push(FavoriteBook {
        book: seed_book(
            "fan-1",
            "The Ember Crown",
            &["Fantasy"],
            &["Nadia Ortiz"],
            "2019",
            412,
            4.4,
            1800,
        ),
        added_at: Utc::now(),
    });
    ana.reading_lists.push(ReadingList {
        id: "list-1".to_string(),
        name: "2026 shelf".to_string(),
        books: vec![
            ListEntry {
                book: seed_book(
                    "mys-1",
                    "Cold Case at Dunmore",
                    &["Mystery"],
                    &["June Park"],
                    "2020",
                    324,
                    4.0,
                    2300,
                ),
                status: ReadingStatus::Read,
            },
            ListEntry {
                book: seed_book(
                    "sci-1",
                    "Starfall Protocol",
                    &["Science Fiction"],
                    &["Ada Chen"],
                    "2018",
                    455,
                    4.1,
                    3100,
                ),
                status: ReadingStatus::ToRead,
            },
        ],
    });
    ana
}
