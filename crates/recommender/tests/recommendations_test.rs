//! Integration tests for the recommenders.
//!
//! These build a context from in-memory records and check the behaviour
//! callers depend on: resolution of queries, error kinds, and the ordering
//! and range guarantees of both result lists.

use data_loader::{DuplicatePolicy, Movie, Rating, RatingStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recommender::{RecommendError, RecommenderConfig, RecommenderContext};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("recommender=debug")
        .with_test_writer()
        .try_init();
}

fn build(movies: Vec<Movie>, ratings: Vec<Rating>) -> RecommenderContext {
    init_tracing();
    let store = RatingStore::from_records(movies, ratings, DuplicatePolicy::default()).unwrap();
    RecommenderContext::build(store, RecommenderConfig::default())
}

fn toy_story_setup() -> RecommenderContext {
    build(
        vec![
            Movie::new(1, "Toy Story", "Animation"),
            Movie::new(2, "Jumanji", "Adventure"),
        ],
        vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 2, 1.0),
            Rating::new(2, 1, 4.0),
            Rating::new(2, 2, 2.0),
        ],
    )
}

/// 40 users, 30 movies, roughly a third of the cells rated
fn synthetic_setup(seed: u64) -> RecommenderContext {
    let mut rng = StdRng::seed_from_u64(seed);
    let movies = (1..=30)
        .map(|id| Movie::new(id, format!("Synthetic Movie {id} (1990)"), "Drama|Comedy"))
        .collect();

    let mut ratings = Vec::new();
    for user_id in 1..=40 {
        for movie_id in 1..=30 {
            if rng.random_bool(0.35) {
                let stars = rng.random_range(1..=10) as f32 / 2.0;
                ratings.push(Rating::new(user_id, movie_id, stars));
            }
        }
    }
    build(movies, ratings)
}

#[test]
fn test_toy_story_scenario() {
    let ctx = toy_story_setup();
    let expected = 13.0 / (41.0f64.sqrt() * 5.0f64.sqrt());

    let sim = ctx.item_similarity().get(1, 2).unwrap();
    assert!((sim - expected).abs() < 1e-12);

    let result = ctx.recommend_by_title("Toy", 1).unwrap();
    assert_eq!(result.title, "Toy Story");
    assert_eq!(result.recommendations.len(), 1);

    let top = &result.recommendations[0];
    assert_eq!(top.rank, 1);
    assert_eq!(top.title, "Jumanji");
    assert_eq!(top.genres, "Adventure");
    assert!((top.similarity_score - expected).abs() < 1e-12);
}

#[test]
fn test_unknown_title_is_not_found() {
    let ctx = toy_story_setup();
    let err = ctx.recommend_by_title("Zzzz", 5).unwrap_err();
    assert!(matches!(err, RecommendError::MovieNotFound { .. }));
}

#[test]
fn test_unknown_user_is_not_found() {
    let ctx = toy_story_setup();
    let err = ctx.recommend_for_user(999, 5).unwrap_err();
    assert!(matches!(err, RecommendError::UserNotFound { user_id: 999 }));
}

#[test]
fn test_movie_without_ratings_is_insufficient_data() {
    let ctx = build(
        vec![
            Movie::new(1, "Toy Story", "Animation"),
            Movie::new(2, "Jumanji", "Adventure"),
            Movie::new(3, "Grumpier Old Men", "Comedy|Romance"),
        ],
        vec![Rating::new(1, 1, 5.0), Rating::new(1, 2, 3.0)],
    );
    let err = ctx.recommend_by_title("grumpier", 5).unwrap_err();
    assert!(matches!(err, RecommendError::InsufficientData { movie_id: 3 }));
}

#[test]
fn test_self_similarity_is_one() {
    let ctx = synthetic_setup(1);
    let sim = ctx.item_similarity();
    for &movie_id in ctx.matrix().movie_ids() {
        assert_eq!(sim.get(movie_id, movie_id), Some(1.0));
    }
}

#[test]
fn test_similarity_matrices_are_symmetric() {
    let ctx = synthetic_setup(2);
    for sim in [ctx.item_similarity(), ctx.user_similarity()] {
        for &a in sim.ids() {
            for &b in sim.ids() {
                assert_eq!(sim.get(a, b), sim.get(b, a));
            }
        }
    }
}

#[test]
fn test_title_recommendations_properties() {
    let ctx = synthetic_setup(3);
    let k = 7;

    for movie in ctx.store().movies() {
        let result = match ctx.recommend_by_title(&movie.title, k) {
            Ok(result) => result,
            Err(RecommendError::InsufficientData { .. }) => continue,
            Err(other) => panic!("unexpected error: {other}"),
        };
        let recs = &result.recommendations;

        assert!(recs.len() <= k);
        assert!(recs.iter().all(|r| r.movie_id != result.movie_id));
        assert!(recs.iter().all(|r| (-1.0..=1.0).contains(&r.similarity_score)));
        assert!(recs.windows(2).all(|w| w[0].similarity_score >= w[1].similarity_score));
    }
}

#[test]
fn test_user_recommendations_properties() {
    let ctx = synthetic_setup(4);
    let matrix = ctx.matrix();
    let neighborhood = ctx.config().neighborhood_size;

    for user_id in matrix.user_ids() {
        let recs = ctx.recommend_for_user(user_id, 10).unwrap();
        assert!(recs.len() <= 10);
        assert!(recs.windows(2).all(|w| w[0].predicted_rating >= w[1].predicted_rating));

        let neighbors: Vec<u32> = ctx
            .user_similarity()
            .ranked(user_id)
            .into_iter()
            .take(neighborhood)
            .map(|(id, _)| id)
            .collect();

        for rec in &recs {
            assert_eq!(matrix.get(user_id, rec.movie_id), None);

            let used: Vec<f64> = neighbors
                .iter()
                .filter_map(|&n| matrix.get(n, rec.movie_id))
                .map(f64::from)
                .collect();
            assert!(!used.is_empty());

            let min = used.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = used.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(rec.predicted_rating >= min - 1e-9);
            assert!(rec.predicted_rating <= max + 1e-9);
        }
    }
}

#[test]
fn test_reject_duplicates_fails_load() {
    let movies = vec![Movie::new(1, "Toy Story", "Animation")];
    let ratings = vec![Rating::new(1, 1, 5.0), Rating::new(1, 1, 3.0)];
    assert!(RatingStore::from_records(movies, ratings, DuplicatePolicy::Reject).is_err());
}

#[test]
fn test_last_write_wins_uses_later_rating() {
    let ctx = build(
        vec![Movie::new(1, "Toy Story", "Animation")],
        vec![Rating::new(1, 1, 5.0), Rating::new(1, 1, 3.0)],
    );
    assert_eq!(ctx.matrix().get(1, 1), Some(3.0));
}
