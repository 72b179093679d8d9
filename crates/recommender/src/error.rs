//! Errors returned by recommendation calls.
//!
//! None of these are fatal: the caller reports the message and carries on.

use data_loader::{MovieId, UserId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    /// No movie title contains the query
    #[error("Movie not found! Try another title.")]
    MovieNotFound { query: String },

    /// The user has no ratings in the matrix
    #[error("User ID not found!")]
    UserNotFound { user_id: UserId },

    /// The movie exists but received no ratings, so it has no similarity data
    #[error("Not enough rating data for this movie.")]
    InsufficientData { movie_id: MovieId },

    /// Nothing to sample from
    #[error("No movies loaded")]
    EmptyCatalog,
}

impl RecommendError {
    /// True for the unknown-title and unknown-user cases
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RecommendError::MovieNotFound { .. } | RecommendError::UserNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
