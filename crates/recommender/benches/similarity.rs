//! Benchmarks for similarity computation and recommendation calls
//!
//! Run with: cargo bench --package recommender
//!
//! Uses a synthetic dataset so the benchmark runs without the MovieLens files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{DuplicatePolicy, Movie, Rating, RatingStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recommender::{Axis, RecommenderConfig, RecommenderContext, SimilarityMatrix, UserMovieMatrix};

const USERS: u32 = 300;
const MOVIES: u32 = 1_000;

fn synthetic_store() -> RatingStore {
    let mut rng = StdRng::seed_from_u64(42);
    let movies = (1..=MOVIES)
        .map(|id| Movie::new(id, format!("Movie {id} (2000)"), "Drama"))
        .collect();

    let mut ratings = Vec::new();
    for user_id in 1..=USERS {
        for movie_id in 1..=MOVIES {
            if rng.random_bool(0.05) {
                let stars = rng.random_range(1..=10) as f32 / 2.0;
                ratings.push(Rating::new(user_id, movie_id, stars));
            }
        }
    }
    RatingStore::from_records(movies, ratings, DuplicatePolicy::default())
        .expect("Failed to build synthetic store")
}

fn bench_similarity(c: &mut Criterion) {
    let store = synthetic_store();
    let matrix = UserMovieMatrix::build(store.ratings());
    let dense = matrix.filled();

    c.bench_function("item_similarity", |b| {
        b.iter(|| SimilarityMatrix::from_ratings(black_box(&matrix), Axis::Columns))
    });

    c.bench_function("user_similarity", |b| {
        b.iter(|| SimilarityMatrix::from_ratings(black_box(&matrix), Axis::Rows))
    });

    c.bench_function("item_similarity_dense_fill", |b| {
        b.iter(|| SimilarityMatrix::compute(black_box(&dense), Axis::Columns))
    });
}

fn bench_recommendations(c: &mut Criterion) {
    let ctx = RecommenderContext::build(synthetic_store(), RecommenderConfig::default());

    c.bench_function("recommend_by_title", |b| {
        b.iter(|| ctx.recommend_by_title(black_box("Movie 17 (2000)"), black_box(5)))
    });

    c.bench_function("recommend_for_user", |b| {
        b.iter(|| ctx.recommend_for_user(black_box(1), black_box(5)))
    });
}

criterion_group!(benches, bench_similarity, bench_recommendations);
criterion_main!(benches);
