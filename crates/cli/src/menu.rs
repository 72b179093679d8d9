//! Interactive menu loop.
//!
//! Each line of input is parsed into a [`MenuCommand`] and dispatched; the
//! dispatch returns a [`MenuOutcome`] telling the loop whether to continue.
//! Recommendation errors are printed and the loop carries on; only I/O
//! failures end the session early.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use colored::Colorize;
use rand::Rng;
use recommender::{RecommendError, RecommenderContext, TitleRecommendations};
use std::io::{BufRead, Write};
use tracing::debug;

/// A parsed menu choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    /// 1: recommendations for a typed title
    ByTitle,
    /// 2: sample a random movie, optionally expand it
    Random,
    /// 3: leave the loop
    Quit,
    /// Anything else, kept for the error message
    Invalid(String),
}

impl MenuCommand {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => MenuCommand::ByTitle,
            "2" => MenuCommand::Random,
            "3" => MenuCommand::Quit,
            other => MenuCommand::Invalid(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Continue,
    Exit,
}

/// One interactive session over arbitrary input and output streams
pub struct Menu<'a, R, W, G> {
    ctx: &'a RecommenderContext,
    input: R,
    output: W,
    rng: G,
    limit: usize,
    format: OutputFormat,
}

impl<'a, R, W, G> Menu<'a, R, W, G>
where
    R: BufRead,
    W: Write,
    G: Rng,
{
    pub fn new(ctx: &'a RecommenderContext, input: R, output: W, rng: G) -> Self {
        Self {
            ctx,
            input,
            output,
            rng,
            limit: recommender::DEFAULT_LIMIT,
            format: OutputFormat::Table,
        }
    }

    /// Number of rows per recommendation list (default: 5)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Run until the user quits or input ends
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "\nChoose an option:")?;
        writeln!(self.output, "1. Enter a movie title to get recommendations")?;
        writeln!(self.output, "2. Get a random movie suggestion")?;
        writeln!(self.output, "3. Quit")?;

        loop {
            let Some(line) = self.prompt("\nYour choice (1/2/3): ")? else {
                break;
            };
            let command = MenuCommand::parse(&line);
            debug!(?command, "Menu command");

            if self.dispatch(command)? == MenuOutcome::Exit {
                break;
            }
        }
        Ok(())
    }

    pub fn dispatch(&mut self, command: MenuCommand) -> Result<MenuOutcome> {
        match command {
            MenuCommand::ByTitle => {
                let Some(title) = self.prompt("Movie title: ")? else {
                    return Ok(MenuOutcome::Exit);
                };
                let title = title.trim();
                if title.is_empty() {
                    writeln!(self.output, "{}", "Please enter a movie title.".yellow())?;
                    return Ok(MenuOutcome::Continue);
                }
                let result = self.ctx.recommend_by_title(title, self.limit);
                self.show(result)?;
            }
            MenuCommand::Random => {
                let movie = match self.ctx.random_movie(&mut self.rng) {
                    Ok(movie) => movie,
                    Err(err) => {
                        writeln!(self.output, "{}", err.to_string().yellow())?;
                        return Ok(MenuOutcome::Continue);
                    }
                };
                output::print_movie(&mut self.output, movie, self.format)?;

                let Some(answer) =
                    self.prompt("\nWould you like to see similar movies? (yes/no): ")?
                else {
                    return Ok(MenuOutcome::Exit);
                };
                if matches!(answer.trim().to_lowercase().as_str(), "yes" | "y") {
                    let result = self.ctx.recommend_by_movie_id(movie.id, self.limit);
                    self.show(result)?;
                }
            }
            MenuCommand::Quit => {
                writeln!(self.output, "Thanks for using the movie recommender :)")?;
                return Ok(MenuOutcome::Exit);
            }
            MenuCommand::Invalid(choice) => {
                debug!(%choice, "Invalid menu choice");
                writeln!(self.output, "Invalid choice. Please enter 1, 2, or 3.")?;
            }
        }
        Ok(MenuOutcome::Continue)
    }

    fn show(&mut self, result: Result<TitleRecommendations, RecommendError>) -> Result<()> {
        match result {
            Ok(recommendations) => {
                writeln!(self.output)?;
                output::print_similar(&mut self.output, &recommendations, self.format)
            }
            Err(err) => {
                writeln!(self.output, "{}", err.to_string().yellow())?;
                Ok(())
            }
        }
    }

    /// Print `text` and read one line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
