//! Time each startup stage on a MovieLens directory.
//!
//! Run with: cargo run --release --example benchmark_build -p recommender [DATA_DIR]

use data_loader::{DuplicatePolicy, RatingStore};
use recommender::{RecommenderConfig, RecommenderContext};
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/ml-latest-small"));

    let start = Instant::now();
    let store = RatingStore::load_from_dir(&data_dir, DuplicatePolicy::default())
        .expect("Failed to load dataset");
    let load_time = start.elapsed();
    let (users, movies, ratings) = store.counts();

    let start = Instant::now();
    let ctx = RecommenderContext::build(store, RecommenderConfig::default());
    let build_time = start.elapsed();

    let first_user = ctx.matrix().user_ids().next();
    let start = Instant::now();
    if let Some(user_id) = first_user {
        let _ = ctx.recommend_for_user(user_id, 5);
    }
    let query_time = start.elapsed();

    println!("{} users, {} movies, {} ratings", users, movies, ratings);
    println!(
        "{:<22} {:?} ({:.0} ratings/s)",
        "parse + index:",
        load_time,
        ratings as f64 / load_time.as_secs_f64()
    );
    println!(
        "{:<22} {:?} ({} x {} movie pairs)",
        "similarity matrices:",
        build_time,
        ctx.item_similarity().len(),
        ctx.item_similarity().len()
    );
    println!("{:<22} {:?}", "one user query:", query_time);
}
