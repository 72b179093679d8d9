//! # Recommender Crate
//!
//! Cosine-similarity collaborative filtering over a [`RatingStore`].
//!
//! ## Components
//!
//! - **matrix**: sparse user × movie ratings and their dense fill
//! - **similarity**: pairwise cosine similarity over rows or columns
//! - **item**: movies similar to a movie found by title
//! - **user**: rating predictions from the nearest neighbour users
//! - **context**: the immutable state every call reads from
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{RecommenderConfig, RecommenderContext};
//! use std::path::Path;
//!
//! let ctx = RecommenderContext::load(Path::new("data/ml-latest-small"), RecommenderConfig::default())?;
//!
//! let similar = ctx.recommend_by_title("toy story", 5)?;
//! let for_user = ctx.recommend_for_user(1, 5)?;
//! let movie = ctx.random_movie(&mut rand::rng())?;
//! ```
//!
//! [`RatingStore`]: data_loader::RatingStore

// Public modules
pub mod config;
pub mod context;
pub mod error;
pub mod item;
pub mod matrix;
pub mod similarity;
pub mod types;
pub mod user;

// Re-export commonly used types
pub use config::{DEFAULT_LIMIT, DEFAULT_NEIGHBORHOOD_SIZE, RecommenderConfig};
pub use context::{RecommenderContext, random_movie};
pub use error::{RecommendError, Result};
pub use matrix::{DenseMatrix, UserMovieMatrix};
pub use similarity::{Axis, SimilarityMatrix, cosine_similarity};
pub use types::{PredictedMovie, SimilarMovie, TitleRecommendations};
