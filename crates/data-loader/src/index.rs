//! RatingStore building and indexing logic.
//!
//! Builds the store from parsed records:
//! - Primary data (movies by id, ratings in source order)
//! - Secondary index (genre_index)
//! - Aggregate statistics (movie stats)
//! - Duplicate-rating check according to the configured `DuplicatePolicy`

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// File names expected inside a dataset directory
pub const MOVIES_FILE: &str = "movies.csv";
pub const RATINGS_FILE: &str = "ratings.csv";

impl RatingStore {
    /// Load `movies.csv` and `ratings.csv` from a dataset directory
    pub fn load_from_dir(data_dir: &Path, policy: DuplicatePolicy) -> Result<Self> {
        Self::load(
            &data_dir.join(MOVIES_FILE),
            &data_dir.join(RATINGS_FILE),
            policy,
        )
    }

    /// Load the two tables and build the store.
    ///
    /// Both files are parsed in parallel; the first error aborts the load.
    pub fn load(movies_path: &Path, ratings_path: &Path, policy: DuplicatePolicy) -> Result<Self> {
        info!(
            movies = %movies_path.display(),
            ratings = %ratings_path.display(),
            "Loading dataset"
        );

        let (movies, ratings) = rayon::join(
            || parser::parse_movies_file(movies_path),
            || parser::parse_ratings_file(ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        info!("Parsed {} movies and {} ratings", movies.len(), ratings.len());
        Self::from_records(movies, ratings, policy)
    }

    /// Build a store from in-memory records
    pub fn from_records(
        movies: Vec<Movie>,
        ratings: Vec<Rating>,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        let mut store = RatingStore::new();

        for movie in movies {
            store.insert_movie(movie);
        }
        store.ratings = ratings;

        store.check_duplicates(policy)?;
        store.build_secondary_indices();
        store.compute_movie_stats();

        let unknown = store
            .ratings
            .iter()
            .filter(|r| !store.movies.contains_key(&r.movie_id))
            .count();
        if unknown > 0 {
            warn!("{} ratings reference movies missing from the movies table", unknown);
        }

        let (users, movies, ratings) = store.counts();
        info!(users, movies, ratings, "Rating store built");
        Ok(store)
    }

    /// Insert a movie; the first row for an id wins
    pub fn insert_movie(&mut self, movie: Movie) {
        if let Some(existing) = self.movies.get(&movie.id) {
            warn!(
                movie_id = movie.id,
                kept = %existing.title,
                ignored = %movie.title,
                "Duplicate movie id"
            );
            return;
        }
        self.movies.insert(movie.id, movie);
    }

    /// Build the genre index after movies are loaded
    pub fn build_secondary_indices(&mut self) {
        self.genre_index.clear();
        for (movie_id, movie) in &self.movies {
            for tag in movie.genre_tags() {
                self.genre_index
                    .entry(tag.to_string())
                    .or_default()
                    .push(*movie_id);
            }
        }
        debug!("Indexed {} genres", self.genre_index.len());
    }

    /// Compute average rating, rating count and popularity for every
    /// movie that received at least one rating
    pub fn compute_movie_stats(&mut self) {
        let totals: HashMap<MovieId, (f32, u32)> = self
            .ratings
            .par_iter()
            .fold(HashMap::new, |mut acc: HashMap<MovieId, (f32, u32)>, rating| {
                let entry = acc.entry(rating.movie_id).or_insert((0.0, 0));
                entry.0 += rating.rating;
                entry.1 += 1;
                acc
            })
            .reduce(HashMap::new, |mut acc, local| {
                for (movie_id, (sum, count)) in local {
                    let entry = acc.entry(movie_id).or_insert((0.0, 0));
                    entry.0 += sum;
                    entry.1 += count;
                }
                acc
            });

        self.movie_stats = totals
            .into_iter()
            .map(|(movie_id, (sum, rating_count))| {
                let avg_rating = sum / rating_count as f32;
                (
                    movie_id,
                    MovieStats {
                        avg_rating,
                        rating_count,
                        popularity_score: compute_popularity_score(avg_rating, rating_count),
                    },
                )
            })
            .collect();
    }

    /// Apply the duplicate policy to the (user, movie) pairs in `ratings`
    fn check_duplicates(&self, policy: DuplicatePolicy) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.ratings.len());
        let mut duplicates = 0usize;

        for rating in &self.ratings {
            if !seen.insert((rating.user_id, rating.movie_id)) {
                if policy == DuplicatePolicy::Reject {
                    return Err(DataLoadError::DuplicateRating {
                        user_id: rating.user_id,
                        movie_id: rating.movie_id,
                    });
                }
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            warn!(
                "{} duplicate (user, movie) ratings; the later rating wins",
                duplicates
            );
        }
        Ok(())
    }
}

/// Helper function to compute popularity score
///
/// avg_rating * ln(rating_count + 1) rewards both high ratings and many ratings
fn compute_popularity_score(avg_rating: f32, rating_count: u32) -> f32 {
    avg_rating * (rating_count as f32 + 1.0).ln()
}
