mod menu;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DuplicatePolicy, Movie, MovieId, RatingStore, UserId};
use menu::Menu;
use output::OutputFormat;
use recommender::{RecommenderConfig, RecommenderContext};
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// movie-recs - Movie recommendations from MovieLens ratings
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Item- and user-based movie recommendations using cosine similarity", long_about = None)]
struct Cli {
    /// Path to a directory holding movies.csv and ratings.csv
    #[arg(short, long, default_value = "data/ml-latest-small", global = true)]
    data_dir: PathBuf,

    /// Number of recommendations to return
    #[arg(short, long, default_value_t = recommender::DEFAULT_LIMIT, global = true)]
    limit: usize,

    /// Number of similar users consulted for user recommendations
    #[arg(long, default_value_t = recommender::DEFAULT_NEIGHBORHOOD_SIZE, global = true)]
    neighbors: usize,

    /// Fail the load when a user rated the same movie twice
    #[arg(long, global = true)]
    reject_duplicates: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Movies similar to the first title matching a query
    Similar {
        /// Case-insensitive substring of the movie title
        #[arg(long)]
        title: String,
    },

    /// Predicted ratings for movies a user has not rated
    User {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,
    },

    /// Pick a random movie
    Random {
        /// Also list movies similar to the pick
        #[arg(long)]
        similar: bool,
    },

    /// Search for movies by title, genre or year
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long, default_value = "")]
        title: String,

        /// Only movies tagged with this genre (e.g. "Comedy")
        #[arg(long)]
        genre: Option<String>,

        /// Only movies released in this year
        #[arg(long)]
        year: Option<u16>,
    },

    /// Menu-driven session (default)
    Interactive,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let policy = if cli.reject_duplicates {
        DuplicatePolicy::Reject
    } else {
        DuplicatePolicy::LastWriteWins
    };
    let config = RecommenderConfig::new()
        .with_neighborhood_size(cli.neighbors)
        .with_duplicate_policy(policy);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    // Status lines go to stderr so --json output stays parseable
    eprintln!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let store = RatingStore::load_from_dir(&cli.data_dir, policy)
        .context("Failed to load MovieLens dataset")?;
    let (users, movies, ratings) = store.counts();
    eprintln!(
        "{} Loaded {} movies, {} users, {} ratings in {:?}",
        "✓".green(),
        movies,
        users,
        ratings,
        start.elapsed()
    );

    let command = cli.command.unwrap_or(Commands::Interactive);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Commands that never read a similarity score skip the matrix build
    match &command {
        Commands::Search { title, genre, year } => {
            let filter = SearchFilter {
                title,
                genre: genre.as_deref(),
                year: *year,
            };
            return Ok(exit_code(handle_search(&store, &mut out, &filter)?));
        }
        Commands::Random { similar: false } => {
            return Ok(exit_code(handle_random(&store, None, &mut out, cli.limit, format)?));
        }
        _ => {}
    }

    let start = Instant::now();
    let ctx = RecommenderContext::build(store, config);
    eprintln!(
        "{} Built similarity matrices in {:?}",
        "✓".green(),
        start.elapsed()
    );

    let ok = match command {
        Commands::Similar { title } => handle_similar(&ctx, &mut out, &title, cli.limit, format)?,
        Commands::User { user_id } => handle_user(&ctx, &mut out, user_id, cli.limit, format)?,
        Commands::Random { .. } => {
            handle_random(ctx.store(), Some(&ctx), &mut out, cli.limit, format)?
        }
        Commands::Search { title, genre, year } => {
            let filter = SearchFilter {
                title: &title,
                genre: genre.as_deref(),
                year,
            };
            handle_search(ctx.store(), &mut out, &filter)?
        }
        Commands::Interactive => {
            drop(out);
            let stdin = io::stdin();
            Menu::new(&ctx, stdin.lock(), io::stdout().lock(), rand::rng())
                .with_limit(cli.limit)
                .with_format(format)
                .run()?;
            true
        }
    };

    Ok(exit_code(ok))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Handle the 'similar' command
fn handle_similar(
    ctx: &RecommenderContext,
    out: &mut impl Write,
    title: &str,
    limit: usize,
    format: OutputFormat,
) -> Result<bool> {
    if title.trim().is_empty() {
        eprintln!("{}", "Please enter a movie title.".yellow());
        return Ok(false);
    }
    match ctx.recommend_by_title(title.trim(), limit) {
        Ok(recommendations) => {
            output::print_similar(out, &recommendations, format)?;
            Ok(true)
        }
        Err(err) => {
            eprintln!("{}", err.to_string().yellow());
            Ok(false)
        }
    }
}

/// Handle the 'user' command
fn handle_user(
    ctx: &RecommenderContext,
    out: &mut impl Write,
    user_id: UserId,
    limit: usize,
    format: OutputFormat,
) -> Result<bool> {
    match ctx.recommend_for_user(user_id, limit) {
        Ok(recommendations) => {
            output::print_predictions(out, user_id, &recommendations, format)?;
            Ok(true)
        }
        Err(err) => {
            eprintln!("{}", err.to_string().yellow());
            Ok(false)
        }
    }
}

/// Handle the 'random' command; similar movies are listed only when a
/// context is given
fn handle_random(
    store: &RatingStore,
    ctx: Option<&RecommenderContext>,
    out: &mut impl Write,
    limit: usize,
    format: OutputFormat,
) -> Result<bool> {
    let movie = match recommender::random_movie(store, &mut rand::rng()) {
        Ok(movie) => movie,
        Err(err) => {
            eprintln!("{}", err.to_string().yellow());
            return Ok(false);
        }
    };
    output::print_movie(out, movie, format)?;

    let Some(ctx) = ctx else {
        return Ok(true);
    };
    match ctx.recommend_by_movie_id(movie.id, limit) {
        Ok(recommendations) => {
            writeln!(out)?;
            output::print_similar(out, &recommendations, format)?;
            Ok(true)
        }
        Err(err) => {
            eprintln!("{}", err.to_string().yellow());
            Ok(false)
        }
    }
}

/// Criteria of the 'search' command; unset filters match everything
struct SearchFilter<'a> {
    title: &'a str,
    genre: Option<&'a str>,
    year: Option<u16>,
}

/// Handle the 'search' command
fn handle_search(store: &RatingStore, out: &mut impl Write, filter: &SearchFilter) -> Result<bool> {
    let title_lower = filter.title.trim().to_lowercase();
    let in_genre: Option<HashSet<MovieId>> = filter
        .genre
        .map(|genre| store.movies_by_genre(genre).iter().copied().collect());

    // (movie, exact title match, avg rating, count)
    let mut matches: Vec<(&Movie, bool, f32, u32)> = store
        .search_titles(&title_lower)
        .into_iter()
        .filter(|movie| in_genre.as_ref().is_none_or(|ids| ids.contains(&movie.id)))
        .filter(|movie| filter.year.is_none_or(|year| movie.year == Some(year)))
        .map(|movie| {
            let stats = store.movie_stats(movie.id);
            (
                movie,
                !title_lower.is_empty() && movie.title.to_lowercase() == title_lower,
                stats.map(|s| s.avg_rating).unwrap_or(0.0),
                stats.map(|s| s.rating_count).unwrap_or(0),
            )
        })
        .collect();

    // Stable: exact match first, then by average rating, ties by id
    matches.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal))
    });

    writeln!(out, "{}", format!("Search results for {}:", filter).bold().blue())?;
    if matches.is_empty() {
        writeln!(out, "  (no matching titles)")?;
        return Ok(false);
    }
    for (movie, _, avg_rating, rating_count) in matches.iter().take(20) {
        writeln!(
            out,
            "{}: {} [{}] avg {:.2} ({} ratings)",
            movie.id.to_string().green(),
            movie.title,
            movie.genre_tags().collect::<Vec<_>>().join(", "),
            avg_rating,
            rating_count
        )?;
    }
    Ok(true)
}

impl fmt::Display for SearchFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.title.trim())?;
        if let Some(genre) = self.genre {
            write!(f, " in {}", genre)?;
        }
        if let Some(year) = self.year {
            write!(f, " from {}", year)?;
        }
        Ok(())
    }
}
