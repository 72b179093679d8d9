//! Rows returned by the recommenders.
//!
//! `rank` is 1-based so the rows can be rendered as a table directly.

use data_loader::MovieId;
use serde::Serialize;

/// A movie similar to the queried one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarMovie {
    pub rank: usize,
    pub movie_id: MovieId,
    pub title: String,
    pub genres: String,
    /// Cosine similarity to the queried movie, in [-1, 1]
    pub similarity_score: f64,
}

/// A movie the user has not rated, with its predicted rating
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedMovie {
    pub rank: usize,
    pub movie_id: MovieId,
    pub title: String,
    pub genres: String,
    /// Similarity-weighted average of the neighbours' ratings
    pub predicted_rating: f64,
}

/// The movie a title query resolved to, with its recommendations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleRecommendations {
    pub movie_id: MovieId,
    pub title: String,
    pub recommendations: Vec<SimilarMovie>,
}
