//! Item-based recommendation: "movies rated like this one"
//!
//! ## Algorithm
//! 1. Resolve the title query to a movie (lowest id among substring matches)
//! 2. Look up its column in the movie-movie similarity matrix
//! 3. Rank every other movie by descending similarity
//! 4. Return the top k, skipping the movie itself

use crate::context::RecommenderContext;
use crate::error::{RecommendError, Result};
use crate::types::{SimilarMovie, TitleRecommendations};
use data_loader::{Movie, MovieId};
use tracing::{debug, instrument};

#[instrument(skip(ctx))]
pub fn recommend_by_title(
    ctx: &RecommenderContext,
    query: &str,
    k: usize,
) -> Result<TitleRecommendations> {
    let movie = ctx
        .store()
        .find_by_title(query)
        .ok_or_else(|| RecommendError::MovieNotFound {
            query: query.to_string(),
        })?;
    debug!(movie_id = movie.id, title = %movie.title, "Resolved title query");

    similar_to(ctx, movie, k)
}

/// Same as [`recommend_by_title`] for an already known movie
#[instrument(skip(ctx))]
pub fn recommend_by_movie_id(
    ctx: &RecommenderContext,
    movie_id: MovieId,
    k: usize,
) -> Result<TitleRecommendations> {
    let movie = ctx
        .store()
        .get_movie(movie_id)
        .ok_or_else(|| RecommendError::MovieNotFound {
            query: movie_id.to_string(),
        })?;

    similar_to(ctx, movie, k)
}

fn similar_to(ctx: &RecommenderContext, movie: &Movie, k: usize) -> Result<TitleRecommendations> {
    let similarity = ctx.item_similarity();
    if !similarity.contains(movie.id) {
        return Err(RecommendError::InsufficientData { movie_id: movie.id });
    }

    let recommendations: Vec<SimilarMovie> = similarity
        .ranked(movie.id)
        .into_iter()
        .filter_map(|(other_id, score)| {
            // Rated movies missing from the movies table can't be displayed
            ctx.store()
                .get_movie(other_id)
                .map(|other| (other, score))
        })
        .take(k)
        .enumerate()
        .map(|(idx, (other, score))| SimilarMovie {
            rank: idx + 1,
            movie_id: other.id,
            title: other.title.clone(),
            genres: other.genres.clone(),
            similarity_score: score,
        })
        .collect();

    debug!("Found {} similar movies", recommendations.len());
    Ok(TitleRecommendations {
        movie_id: movie.id,
        title: movie.title.clone(),
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecommenderConfig;
    use data_loader::{DuplicatePolicy, Rating, RatingStore};

    fn context() -> RecommenderContext {
        let movies = vec![
            Movie::new(1, "Toy Story (1995)", "Adventure|Animation"),
            Movie::new(2, "Jumanji (1995)", "Adventure|Fantasy"),
            Movie::new(3, "Heat (1995)", "Action|Crime"),
            Movie::new(4, "Toy Story 2 (1999)", "Animation|Comedy"),
            Movie::new(5, "Unrated Curiosity (2001)", "Documentary"),
        ];
        let ratings = vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 2, 4.0),
            Rating::new(1, 4, 5.0),
            Rating::new(2, 1, 4.0),
            Rating::new(2, 4, 4.5),
            Rating::new(2, 3, 1.0),
            Rating::new(3, 3, 5.0),
            Rating::new(3, 2, 2.0),
            // movie 9 has ratings but no metadata
            Rating::new(3, 9, 3.0),
        ];
        let store = RatingStore::from_records(movies, ratings, DuplicatePolicy::default()).unwrap();
        RecommenderContext::build(store, RecommenderConfig::default())
    }

    #[test]
    fn test_resolves_lowest_id_match() {
        let ctx = context();
        let result = recommend_by_title(&ctx, "toy story", 3).unwrap();
        assert_eq!(result.movie_id, 1);
        assert_eq!(result.title, "Toy Story (1995)");
    }

    #[test]
    fn test_most_similar_first() {
        let ctx = context();
        let result = recommend_by_title(&ctx, "Toy Story (1995)", 10).unwrap();
        let recs = &result.recommendations;

        // Toy Story 2 is rated almost identically by the same users
        assert_eq!(recs[0].movie_id, 4);
        assert_eq!(recs[0].rank, 1);
        assert!(recs.windows(2).all(|w| w[0].similarity_score >= w[1].similarity_score));
        assert!(recs.iter().enumerate().all(|(i, r)| r.rank == i + 1));
    }

    #[test]
    fn test_excludes_query_and_unknown_metadata() {
        let ctx = context();
        let result = recommend_by_title(&ctx, "Heat", 10).unwrap();
        let ids: Vec<u32> = result.recommendations.iter().map(|r| r.movie_id).collect();

        assert!(!ids.contains(&3));
        assert!(!ids.contains(&9));
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_respects_k() {
        let ctx = context();
        assert_eq!(recommend_by_title(&ctx, "Jumanji", 2).unwrap().recommendations.len(), 2);
        assert!(recommend_by_title(&ctx, "Jumanji", 0).unwrap().recommendations.is_empty());
    }

    #[test]
    fn test_unknown_title() {
        let ctx = context();
        let err = recommend_by_title(&ctx, "Zzzz", 5).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Movie not found! Try another title.");
    }

    #[test]
    fn test_by_movie_id_skips_title_resolution() {
        let ctx = context();
        let result = recommend_by_movie_id(&ctx, 4, 1).unwrap();
        assert_eq!(result.title, "Toy Story 2 (1999)");
        assert_eq!(result.recommendations[0].movie_id, 1);

        let err = recommend_by_movie_id(&ctx, 77, 1).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unrated_movie_has_no_similarity_data() {
        let ctx = context();
        let err = recommend_by_title(&ctx, "Curiosity", 5).unwrap_err();
        assert_eq!(err, RecommendError::InsufficientData { movie_id: 5 });
        assert_eq!(err.to_string(), "Not enough rating data for this movie.");
    }
}
