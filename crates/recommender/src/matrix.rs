//! User × movie rating matrices.
//!
//! [`UserMovieMatrix`] keeps only observed ratings, so "unrated" and "rated
//! zero" stay distinct. [`DenseMatrix`] is the dense fill of it, where every
//! unrated cell reads as 0.0; it only exists as input to the similarity
//! engine.

use data_loader::{MovieId, Rating, UserId};
use std::collections::BTreeMap;
use tracing::debug;

/// Sparse mapping userId -> (movieId -> rating)
#[derive(Debug, Clone, Default)]
pub struct UserMovieMatrix {
    rows: BTreeMap<UserId, BTreeMap<MovieId, f32>>,
    /// Every movie that received at least one rating, ascending
    movie_ids: Vec<MovieId>,
}

impl UserMovieMatrix {
    /// Build the matrix from raw ratings.
    ///
    /// A later rating for the same (user, movie) pair overwrites an earlier one.
    pub fn build(ratings: &[Rating]) -> Self {
        let mut rows: BTreeMap<UserId, BTreeMap<MovieId, f32>> = BTreeMap::new();
        for rating in ratings {
            rows.entry(rating.user_id)
                .or_default()
                .insert(rating.movie_id, rating.rating);
        }

        let mut movie_ids: Vec<MovieId> = ratings.iter().map(|r| r.movie_id).collect();
        movie_ids.sort_unstable();
        movie_ids.dedup();

        debug!(
            users = rows.len(),
            movies = movie_ids.len(),
            "Built user-movie matrix"
        );
        Self { rows, movie_ids }
    }

    /// Rating given by `user_id` to `movie_id`, `None` if unrated
    pub fn get(&self, user_id: UserId, movie_id: MovieId) -> Option<f32> {
        self.rows.get(&user_id)?.get(&movie_id).copied()
    }

    pub fn user_ratings(&self, user_id: UserId) -> Option<&BTreeMap<MovieId, f32>> {
        self.rows.get(&user_id)
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.rows.contains_key(&user_id)
    }

    pub fn has_movie(&self, movie_id: MovieId) -> bool {
        self.movie_ids.binary_search(&movie_id).is_ok()
    }

    /// Row labels, ascending
    pub fn user_ids(&self) -> impl ExactSizeIterator<Item = UserId> + '_ {
        self.rows.keys().copied()
    }

    /// Column labels, ascending
    pub fn movie_ids(&self) -> &[MovieId] {
        &self.movie_ids
    }

    pub fn user_count(&self) -> usize {
        self.rows.len()
    }

    pub fn movie_count(&self) -> usize {
        self.movie_ids.len()
    }

    /// Dense fill: materialize every unrated cell as 0.0
    pub fn filled(&self) -> DenseMatrix {
        let row_ids: Vec<UserId> = self.rows.keys().copied().collect();
        let n_cols = self.movie_ids.len();
        let mut values = vec![0.0f64; row_ids.len() * n_cols];

        for (row, ratings) in self.rows.values().enumerate() {
            let start = row * n_cols;
            for (movie_id, rating) in ratings {
                // movie_ids holds every rated movie, so the search always hits
                if let Ok(col) = self.movie_ids.binary_search(movie_id) {
                    values[start + col] = f64::from(*rating);
                }
            }
        }

        DenseMatrix {
            row_ids,
            col_ids: self.movie_ids.clone(),
            values,
        }
    }
}

/// Row-major dense users × movies matrix
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    row_ids: Vec<UserId>,
    col_ids: Vec<MovieId>,
    values: Vec<f64>,
}

impl DenseMatrix {
    /// Build from explicit labels and row-major values.
    ///
    /// Returns `None` when `values` does not have `rows * cols` entries.
    pub fn from_rows(row_ids: Vec<UserId>, col_ids: Vec<MovieId>, values: Vec<f64>) -> Option<Self> {
        if values.len() != row_ids.len() * col_ids.len() {
            return None;
        }
        Some(Self {
            row_ids,
            col_ids,
            values,
        })
    }

    pub fn row_ids(&self) -> &[UserId] {
        &self.row_ids
    }

    pub fn col_ids(&self) -> &[MovieId] {
        &self.col_ids
    }

    pub fn n_rows(&self) -> usize {
        self.row_ids.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_ids.len()
    }

    pub fn row(&self, index: usize) -> &[f64] {
        let n_cols = self.n_cols();
        &self.values[index * n_cols..(index + 1) * n_cols]
    }

    pub fn column(&self, index: usize) -> Vec<f64> {
        (0..self.n_rows())
            .map(|row| self.values[row * self.n_cols() + index])
            .collect()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.n_cols() + col]
    }
}
