//! # Recommender Context
//!
//! Immutable state shared by every recommendation call:
//! 1. The rating store (source of truth)
//! 2. The sparse user × movie matrix derived from it
//! 3. Movie-movie similarity (matrix columns)
//! 4. User-user similarity (matrix rows)
//!
//! Everything is built once in [`RecommenderContext::build`]. Calls only read
//! it, so a context can sit behind an `Arc` and be replaced wholesale when the
//! data changes.

use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use crate::matrix::UserMovieMatrix;
use crate::similarity::{Axis, SimilarityMatrix};
use crate::types::{PredictedMovie, TitleRecommendations};
use crate::{item, user};
use data_loader::{Movie, MovieId, RatingStore, UserId};
use rand::Rng;
use std::path::Path;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone)]
pub struct RecommenderContext {
    store: RatingStore,
    matrix: UserMovieMatrix,
    item_similarity: SimilarityMatrix,
    user_similarity: SimilarityMatrix,
    config: RecommenderConfig,
}

impl RecommenderContext {
    /// Derive every matrix from `store`
    pub fn build(store: RatingStore, config: RecommenderConfig) -> Self {
        let start = Instant::now();

        let matrix = UserMovieMatrix::build(store.ratings());

        // Two independent similarity spaces over the same ratings
        let (item_similarity, user_similarity) = rayon::join(
            || SimilarityMatrix::from_ratings(&matrix, Axis::Columns),
            || SimilarityMatrix::from_ratings(&matrix, Axis::Rows),
        );

        info!(
            users = matrix.user_count(),
            movies = matrix.movie_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommender context built"
        );

        Self {
            store,
            matrix,
            item_similarity,
            user_similarity,
            config,
        }
    }

    /// Load `movies.csv` and `ratings.csv` from `data_dir` and build the context
    pub fn load(data_dir: &Path, config: RecommenderConfig) -> data_loader::Result<Self> {
        let store = RatingStore::load_from_dir(data_dir, config.duplicate_policy)?;
        Ok(Self::build(store, config))
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    pub fn matrix(&self) -> &UserMovieMatrix {
        &self.matrix
    }

    pub fn item_similarity(&self) -> &SimilarityMatrix {
        &self.item_similarity
    }

    pub fn user_similarity(&self) -> &SimilarityMatrix {
        &self.user_similarity
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Pick a movie uniformly at random from the catalog
    pub fn random_movie<R: Rng>(&self, rng: &mut R) -> Result<&Movie> {
        random_movie(&self.store, rng)
    }

    /// Movies similar to the first title matching `query`
    pub fn recommend_by_title(&self, query: &str, k: usize) -> Result<TitleRecommendations> {
        item::recommend_by_title(self, query, k)
    }

    /// Movies similar to the movie with id `movie_id`
    pub fn recommend_by_movie_id(&self, movie_id: MovieId, k: usize) -> Result<TitleRecommendations> {
        item::recommend_by_movie_id(self, movie_id, k)
    }

    /// Unrated movies for `user_id`, predicted from similar users
    pub fn recommend_for_user(&self, user_id: UserId, k: usize) -> Result<Vec<PredictedMovie>> {
        user::recommend_for_user(self, user_id, k)
    }
}

/// Pick a movie uniformly at random from `store`.
///
/// Needs no similarity data, so callers that only sample can skip
/// [`RecommenderContext::build`].
pub fn random_movie<'a, R: Rng>(store: &'a RatingStore, rng: &mut R) -> Result<&'a Movie> {
    let count = store.movies().len();
    if count == 0 {
        return Err(RecommendError::EmptyCatalog);
    }
    let index = rng.random_range(0..count);
    store.movies().nth(index).ok_or(RecommendError::EmptyCatalog)
}
