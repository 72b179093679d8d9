//! User-based collaborative filtering
//!
//! "Users who rate like you rated these movies this way"
//!
//! ## Algorithm
//! 1. Take the N users most similar to the target (N = neighbourhood size)
//! 2. For every movie the target has not rated, average the neighbours'
//!    ratings weighted by their similarity, over neighbours who rated it
//! 3. Drop movies no neighbour rated, or whose similarity sum is <= 0
//! 4. Return the top k by predicted rating

use crate::context::RecommenderContext;
use crate::error::{RecommendError, Result};
use crate::types::PredictedMovie;
use data_loader::{MovieId, UserId};
use std::cmp::Ordering;
use tracing::{debug, instrument};

#[instrument(skip(ctx), fields(neighborhood = ctx.config().neighborhood_size))]
pub fn recommend_for_user(
    ctx: &RecommenderContext,
    user_id: UserId,
    k: usize,
) -> Result<Vec<PredictedMovie>> {
    let matrix = ctx.matrix();
    let rated = matrix
        .user_ratings(user_id)
        .ok_or(RecommendError::UserNotFound { user_id })?;

    let neighbors = find_neighbors(ctx, user_id);
    debug!("Found {} neighbours", neighbors.len());

    let mut predictions = predict_unrated(ctx, &neighbors, |movie_id| {
        rated.contains_key(&movie_id)
    });
    debug!("Predicted ratings for {} movies", predictions.len());

    // Stable sort: equal predictions keep ascending movie id order
    predictions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let recommendations = predictions
        .into_iter()
        .filter_map(|(movie_id, predicted)| {
            ctx.store()
                .get_movie(movie_id)
                .map(|movie| (movie, predicted))
        })
        .take(k)
        .enumerate()
        .map(|(idx, (movie, predicted_rating))| PredictedMovie {
            rank: idx + 1,
            movie_id: movie.id,
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            predicted_rating,
        })
        .collect();

    Ok(recommendations)
}

/// The most similar other users, most similar first
fn find_neighbors(ctx: &RecommenderContext, user_id: UserId) -> Vec<(UserId, f64)> {
    let mut neighbors = ctx.user_similarity().ranked(user_id);
    neighbors.truncate(ctx.config().neighborhood_size);
    neighbors
}

/// Similarity-weighted average rating for every movie `is_rated` rejects.
///
/// Returned in ascending movie id order.
fn predict_unrated<F>(
    ctx: &RecommenderContext,
    neighbors: &[(UserId, f64)],
    is_rated: F,
) -> Vec<(MovieId, f64)>
where
    F: Fn(MovieId) -> bool,
{
    let matrix = ctx.matrix();
    let mut predictions = Vec::new();

    for &movie_id in matrix.movie_ids() {
        if is_rated(movie_id) {
            continue;
        }

        let mut weighted_sum = 0.0;
        let mut similarity_sum = 0.0;
        for &(neighbor_id, similarity) in neighbors {
            if let Some(rating) = matrix.get(neighbor_id, movie_id) {
                weighted_sum += similarity * f64::from(rating);
                similarity_sum += similarity;
            }
        }

        if similarity_sum > 0.0 {
            predictions.push((movie_id, weighted_sum / similarity_sum));
        }
    }

    predictions
}
