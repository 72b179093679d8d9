//! Parser for the movies and ratings CSV tables.
//!
//! - movies.csv: movieId,title,genres
//! - ratings.csv: userId,movieId,rating[,timestamp]
//!
//! Both tables carry a header row; columns are matched by name, so their
//! order does not matter and extra columns are ignored. Titles may be quoted
//! and contain commas ("American President, The (1995)").

use crate::error::{DataLoadError, Result};
use crate::types::{Movie, MovieId, Rating, UserId};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const MOVIE_COLUMNS: [&str; 3] = ["movieId", "title", "genres"];
const RATING_COLUMNS: [&str; 3] = ["userId", "movieId", "rating"];

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    genres: String,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
    #[serde(default)]
    timestamp: Option<i64>,
}

/// Parse a movies table from any reader
///
/// `file` names the source in error messages.
pub fn parse_movies<R: Read>(source: R, file: &str) -> Result<Vec<Movie>> {
    let mut reader = csv_reader(source);
    require_columns(&mut reader, file, &MOVIE_COLUMNS)?;

    let mut movies = Vec::new();
    for record in reader.deserialize::<MovieRecord>() {
        let record = record.map_err(|e| csv_error(file, e))?;
        movies.push(Movie::new(record.movie_id, record.title, record.genres));
    }
    Ok(movies)
}

/// Parse a ratings table from any reader
pub fn parse_ratings<R: Read>(source: R, file: &str) -> Result<Vec<Rating>> {
    let mut reader = csv_reader(source);
    require_columns(&mut reader, file, &RATING_COLUMNS)?;

    let headers = reader.headers().map_err(|e| csv_error(file, e))?.clone();
    let mut row = csv::StringRecord::new();
    let mut ratings = Vec::new();

    while reader.read_record(&mut row).map_err(|e| csv_error(file, e))? {
        let line = row.position().map(|pos| pos.line()).unwrap_or(0);
        let record: RatingRecord = row
            .deserialize(Some(&headers))
            .map_err(|e| with_line(csv_error(file, e), line))?;

        // NaN or infinity would poison every similarity touching this cell
        if !record.rating.is_finite() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line,
                reason: format!("rating must be a finite number, got {}", record.rating),
            });
        }
        ratings.push(Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            rating: record.rating,
            timestamp: record.timestamp,
        });
    }
    Ok(ratings)
}

/// Parse the movies table at `path`
pub fn parse_movies_file(path: &Path) -> Result<Vec<Movie>> {
    parse_movies(open(path)?, &display_name(path))
}

/// Parse the ratings table at `path`
pub fn parse_ratings_file(path: &Path) -> Result<Vec<Rating>> {
    parse_ratings(open(path)?, &display_name(path))
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source)
}

fn require_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    file: &str,
    required: &[&str],
) -> Result<()> {
    let headers = reader.headers().map_err(|e| csv_error(file, e))?;
    for column in required {
        if !headers.iter().any(|header| header == *column) {
            return Err(DataLoadError::MissingColumn {
                file: file.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn csv_error(file: &str, err: csv::Error) -> DataLoadError {
    let line = err.position().map(|pos| pos.line()).unwrap_or(0);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => DataLoadError::IoError(e),
        csv::ErrorKind::Deserialize { err, .. } => DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason: err.to_string(),
        },
        _ => DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason,
        },
    }
}

/// `StringRecord::deserialize` errors carry no position; fill in the row's
fn with_line(err: DataLoadError, row_line: u64) -> DataLoadError {
    match err {
        DataLoadError::ParseError { file, line: 0, reason } => DataLoadError::ParseError {
            file,
            line: row_line,
            reason,
        },
        other => other,
    }
}
