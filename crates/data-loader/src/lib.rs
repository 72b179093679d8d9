//! # Data Loader Crate
//!
//! Loads the movies and ratings tables into a [`RatingStore`].
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, RatingStore)
//! - **parser**: Parse the CSV tables into Rust structs
//! - **index**: Build the store, its genre index and movie statistics
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{DuplicatePolicy, RatingStore};
//! use std::path::Path;
//!
//! let store = RatingStore::load_from_dir(Path::new("data/ml-latest-small"), DuplicatePolicy::default())?;
//!
//! let movie = store.find_by_title("toy story").unwrap();
//! println!("{} [{}]", movie.title, movie.genres);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{MOVIES_FILE, RATINGS_FILE};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    Rating,
    RatingStore,
    MovieStats,
    DuplicatePolicy,
};
