//! Rendering of recommendation rows as coloured tables or JSON.

use anyhow::Result;
use colored::Colorize;
use data_loader::{Movie, UserId};
use recommender::{PredictedMovie, TitleRecommendations};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn print_similar(
    out: &mut impl Write,
    result: &TitleRecommendations,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(out, result);
    }

    writeln!(
        out,
        "{}",
        format!("Movies similar to {}:", result.title).bold().blue()
    )?;
    if result.recommendations.is_empty() {
        writeln!(out, "  (no other rated movies)")?;
        return Ok(());
    }

    writeln!(out, "{:>4}  {:<50}  {:<40}  {}", "#", "Title", "Genres", "Similarity")?;
    for rec in &result.recommendations {
        writeln!(
            out,
            "{:>4}  {:<50}  {:<40}  {:.4}",
            rec.rank.to_string().green(),
            rec.title,
            rec.genres,
            rec.similarity_score
        )?;
    }
    Ok(())
}

pub fn print_predictions(
    out: &mut impl Write,
    user_id: UserId,
    recommendations: &[PredictedMovie],
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(out, recommendations);
    }

    writeln!(
        out,
        "{}",
        format!("Recommendations for user {}:", user_id).bold().blue()
    )?;
    if recommendations.is_empty() {
        writeln!(out, "  (similar users have not rated anything new)")?;
        return Ok(());
    }

    writeln!(out, "{:>4}  {:<50}  {:<40}  {}", "#", "Title", "Genres", "Predicted")?;
    for rec in recommendations {
        writeln!(
            out,
            "{:>4}  {:<50}  {:<40}  {:.2}",
            rec.rank.to_string().green(),
            rec.title,
            rec.genres,
            rec.predicted_rating
        )?;
    }
    Ok(())
}

pub fn print_movie(out: &mut impl Write, movie: &Movie, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(out, movie);
    }

    writeln!(out, "{} {}", "Random Movie:".bold().blue(), movie.title)?;
    writeln!(out, "{}Genres: {}", "• ".green(), movie.genres)?;
    writeln!(out, "{}Movie ID: {}", "• ".green(), movie.id)?;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
