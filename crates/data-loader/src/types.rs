//! Core domain types for the movies and ratings tables.
//!
//! The `RatingStore` defined here is the single source of truth for the
//! recommender: every matrix downstream is derived from it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user, as found in the `userId` column
pub type UserId = u32;

/// Unique identifier for a movie, as found in the `movieId` column
pub type MovieId = u32;

// =============================================================================
// Movie
// =============================================================================

/// A movie from the movies table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Year extracted from title (e.g., "Toy Story (1995)")
    pub year: Option<u16>,
    /// Pipe-separated genre tags exactly as loaded, e.g. "Adventure|Comedy"
    pub genres: String,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>, genres: impl Into<String>) -> Self {
        let title = title.into();
        let year = extract_year_from_title(&title);
        Self {
            id,
            title,
            year,
            genres: genres.into(),
        }
    }

    /// Individual genre tags, in the order they were listed
    pub fn genre_tags(&self) -> impl Iterator<Item = &str> {
        self.genres
            .split('|')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
pub(crate) fn extract_year_from_title(title: &str) -> Option<u16> {
    let title = title.trim_end();
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        return title[start + 1..end].parse::<u16>().ok();
    }
    None
}

// =============================================================================
// Rating
// =============================================================================

/// A single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value; the range is not validated
    pub rating: f32,
    /// Unix timestamp, when the source carries one
    pub timestamp: Option<i64>,
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f32) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
            timestamp: None,
        }
    }
}

/// What to do when the same (user, movie) pair is rated more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Keep every record; the matrix builder lets the later rating win
    #[default]
    LastWriteWins,
    /// Fail the load with `DataLoadError::DuplicateRating`
    Reject,
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Precomputed statistics for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovieStats {
    pub avg_rating: f32,
    pub rating_count: u32,
    /// avg_rating * ln(rating_count + 1)
    pub popularity_score: f32,
}

// =============================================================================
// RatingStore
// =============================================================================

/// In-memory store of movie metadata and raw ratings.
///
/// Movies are keyed in a `BTreeMap`, so every iteration over the catalog
/// (and therefore every "first match" lookup) runs in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    pub(crate) movies: BTreeMap<MovieId, Movie>,
    /// Raw ratings in source order
    pub(crate) ratings: Vec<Rating>,
    /// Movies grouped by genre tag
    pub(crate) genre_index: HashMap<String, Vec<MovieId>>,
    pub(crate) movie_stats: HashMap<MovieId, MovieStats>,
}

impl RatingStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// All movies in ascending id order
    pub fn movies(&self) -> impl ExactSizeIterator<Item = &Movie> {
        self.movies.values()
    }

    /// All ratings in the order they were loaded
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// First movie (lowest id) whose title contains `query`,
    /// compared case-insensitively as a literal substring
    pub fn find_by_title(&self, query: &str) -> Option<&Movie> {
        let query = query.to_lowercase();
        self.movies
            .values()
            .find(|movie| movie.title.to_lowercase().contains(&query))
    }

    /// Every movie whose title contains `query`, in ascending id order
    pub fn search_titles(&self, query: &str) -> Vec<&Movie> {
        let query = query.to_lowercase();
        self.movies
            .values()
            .filter(|movie| movie.title.to_lowercase().contains(&query))
            .collect()
    }

    /// Get all movies tagged with a genre
    pub fn movies_by_genre(&self, genre: &str) -> &[MovieId] {
        self.genre_index
            .get(genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get precomputed statistics for a movie
    pub fn movie_stats(&self, movie_id: MovieId) -> Option<&MovieStats> {
        self.movie_stats.get(&movie_id)
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// (distinct users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut users: Vec<UserId> = self.ratings.iter().map(|r| r.user_id).collect();
        users.sort_unstable();
        users.dedup();
        (users.len(), self.movies.len(), self.ratings.len())
    }
}
