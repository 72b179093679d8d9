//! Error types for the data-loader crate.
//!
//! Every variant here is fatal at startup: the binary reports it and exits.

use crate::types::{MovieId, UserId};
use thiserror::Error;

/// Errors that can occur while loading the movies and ratings tables
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a source
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The header row does not carry a column the format requires
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// A row couldn't be parsed
    ///
    /// `line` is 1-based and counts the header row.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// The same (user, movie) pair was rated twice and the store was
    /// configured to reject duplicates
    #[error("Duplicate rating for user {user_id} and movie {movie_id}")]
    DuplicateRating { user_id: UserId, movie_id: MovieId },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
