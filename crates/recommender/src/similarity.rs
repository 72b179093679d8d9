//! Cosine similarity between the users or the movies of a rating matrix.
//!
//! ## Algorithm
//! 1. Turn each entity (a user row or a movie column) into a sparse vector
//!    of its non-zero entries, ordered by the other axis
//! 2. Precompute every vector's norm
//! 3. For each entity i, walk its entries and, through the transposed
//!    postings, add `a * b` into every pair (i, j > i) sharing that entry
//! 4. Divide by the norms and store the diagonal and the upper triangle
//!    only, so the result is exactly symmetric
//!
//! Entries that are zero in the dense fill add nothing to a dot product, so
//! the scores equal the dense cosine while the work scales with the number
//! of co-ratings rather than users × movies².
//!
//! The diagonal is 1.0 for any non-zero vector and 0.0 for a zero vector.

use crate::matrix::{DenseMatrix, UserMovieMatrix};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Which entities of a users × movies matrix get compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Compare rows: user-user similarity
    Rows,
    /// Compare columns: movie-movie similarity
    Columns,
}

/// (index on the other axis, value), ascending by index
type SparseVector = Vec<(usize, f64)>;

/// Cosine similarity of two vectors over the same index space.
///
/// Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(u: &[f64], v: &[f64]) -> f64 {
    cosine(dot(u, v), dot(u, u).sqrt(), dot(v, v).sqrt())
}

fn dot(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| a * b).sum()
}

/// Normalize a dot product; 0.0 when either norm is zero, clamped to [-1, 1]
fn cosine(dot: f64, norm_u: f64, norm_v: f64) -> f64 {
    if norm_u == 0.0 || norm_v == 0.0 {
        return 0.0;
    }
    (dot / (norm_u * norm_v)).clamp(-1.0, 1.0)
}

/// Square, symmetric similarity scores labelled by entity id.
///
/// Only the diagonal and the upper triangle are stored; `get(a, b)` and
/// `get(b, a)` read the same cell.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    /// Entity ids in matrix order (ascending, as produced by the matrix builder)
    ids: Vec<u32>,
    positions: HashMap<u32, usize>,
    diagonal: Vec<f64>,
    /// `upper[i][k]` is the score of (i, i + 1 + k)
    upper: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Compute pairwise cosine similarity along `axis` of a dense fill
    #[instrument(skip(dense), fields(rows = dense.n_rows(), cols = dense.n_cols()))]
    pub fn compute(dense: &DenseMatrix, axis: Axis) -> Self {
        match axis {
            Axis::Rows => {
                let vectors: Vec<SparseVector> =
                    (0..dense.n_rows()).map(|i| sparse(dense.row(i))).collect();
                Self::from_sparse(dense.row_ids().to_vec(), vectors, dense.n_cols())
            }
            Axis::Columns => {
                let vectors: Vec<SparseVector> =
                    (0..dense.n_cols()).map(|j| sparse(&dense.column(j))).collect();
                Self::from_sparse(dense.col_ids().to_vec(), vectors, dense.n_rows())
            }
        }
    }

    /// Same scores as `compute(&matrix.filled(), axis)` without materializing
    /// the dense fill
    #[instrument(skip(matrix), fields(users = matrix.user_count(), movies = matrix.movie_count()))]
    pub fn from_ratings(matrix: &UserMovieMatrix, axis: Axis) -> Self {
        let movie_ids = matrix.movie_ids();
        let mut by_user: Vec<SparseVector> = Vec::with_capacity(matrix.user_count());
        let mut by_movie: Vec<SparseVector> = vec![Vec::new(); movie_ids.len()];

        for (user_pos, user_id) in matrix.user_ids().enumerate() {
            let mut row = Vec::new();
            for (movie_id, &rating) in matrix.user_ratings(user_id).into_iter().flatten() {
                // movie_ids holds every rated movie, so the search always hits
                if let Ok(movie_pos) = movie_ids.binary_search(movie_id) {
                    let value = f64::from(rating);
                    row.push((movie_pos, value));
                    by_movie[movie_pos].push((user_pos, value));
                }
            }
            by_user.push(row);
        }

        match axis {
            Axis::Rows => Self::from_sparse(matrix.user_ids().collect(), by_user, movie_ids.len()),
            Axis::Columns => Self::from_sparse(movie_ids.to_vec(), by_movie, matrix.user_count()),
        }
    }

    /// Compute pairwise cosine similarity between labelled dense vectors;
    /// `vectors[i]` belongs to `ids[i]`
    pub fn from_vectors(ids: Vec<u32>, vectors: &[Vec<f64>]) -> Self {
        let width = vectors.iter().map(Vec::len).max().unwrap_or(0);
        let sparse_vectors = vectors.iter().map(|v| sparse(v)).collect();
        Self::from_sparse(ids, sparse_vectors, width)
    }

    /// `vectors[i]` belongs to `ids[i]`; every index is below `width`
    fn from_sparse(mut ids: Vec<u32>, mut vectors: Vec<SparseVector>, width: usize) -> Self {
        debug_assert_eq!(ids.len(), vectors.len());
        let n = ids.len().min(vectors.len());
        ids.truncate(n);
        vectors.truncate(n);

        let norms: Vec<f64> = vectors
            .par_iter()
            .map(|v| v.iter().map(|(_, x)| x * x).sum::<f64>().sqrt())
            .collect();

        // postings[f] lists (entity, value) for every entity with entry f,
        // ascending by entity
        let mut postings: Vec<SparseVector> = vec![Vec::new(); width];
        for (i, vector) in vectors.iter().enumerate() {
            for &(f, value) in vector {
                postings[f].push((i, value));
            }
        }

        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut dots = vec![0.0f64; n - i - 1];
                if norms[i] == 0.0 {
                    return dots;
                }
                for &(f, a) in &vectors[i] {
                    let posting = &postings[f];
                    let after = posting.partition_point(|&(j, _)| j <= i);
                    for &(j, b) in &posting[after..] {
                        dots[j - i - 1] += a * b;
                    }
                }
                for (k, score) in dots.iter_mut().enumerate() {
                    *score = cosine(*score, norms[i], norms[i + 1 + k]);
                }
                dots
            })
            .collect();

        let diagonal = norms
            .iter()
            .map(|&norm| if norm == 0.0 { 0.0 } else { 1.0 })
            .collect();
        let positions = ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();
        debug!("Computed {n}x{n} similarity matrix");

        Self {
            ids,
            positions,
            diagonal,
            upper,
        }
    }

    fn score_at(&self, i: usize, j: usize) -> f64 {
        match i.cmp(&j) {
            Ordering::Equal => self.diagonal[i],
            Ordering::Less => self.upper[i][j - i - 1],
            Ordering::Greater => self.upper[j][i - j - 1],
        }
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.positions.contains_key(&id)
    }

    /// Similarity between two entities, `None` if either is unknown
    pub fn get(&self, a: u32, b: u32) -> Option<f64> {
        let i = *self.positions.get(&a)?;
        let j = *self.positions.get(&b)?;
        Some(self.score_at(i, j))
    }

    /// Every other entity ranked by descending similarity to `id`.
    ///
    /// `id` itself is left out. Ties keep matrix order, which is ascending
    /// id for matrices built by [`SimilarityMatrix::compute`].
    /// Returns an empty list for an unknown id.
    pub fn ranked(&self, id: u32) -> Vec<(u32, f64)> {
        let Some(&row) = self.positions.get(&id) else {
            return Vec::new();
        };
        let mut ranked: Vec<(u32, f64)> = self
            .ids
            .iter()
            .enumerate()
            .filter(|&(col, _)| col != row)
            .map(|(col, &other)| (other, self.score_at(row, col)))
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked
    }
}

/// Non-zero entries of a dense vector
fn sparse(values: &[f64]) -> SparseVector {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v != 0.0)
        .map(|(i, &v)| (i, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn dense() -> DenseMatrix {
        // users 1, 2 × movies 1, 2, 3
        DenseMatrix::from_rows(
            vec![1, 2],
            vec![1, 2, 3],
            vec![
                5.0, 1.0, 0.0, //
                4.0, 2.0, 0.0,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < EPS);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < EPS);
        assert!((cosine_similarity(&[1.0, 1.0], &[-1.0, -1.0]) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_zero_norm_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[3.0, 4.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_columns_compare_movies() {
        let sim = SimilarityMatrix::compute(&dense(), Axis::Columns);
        let expected = 13.0 / (41.0f64.sqrt() * 5.0f64.sqrt());

        assert_eq!(sim.ids(), &[1, 2, 3]);
        assert!((sim.get(1, 2).unwrap() - expected).abs() < EPS);
        // movie 3 has no ratings: zero vector
        assert_eq!(sim.get(3, 3), Some(0.0));
        assert_eq!(sim.get(1, 3), Some(0.0));
    }

    #[test]
    fn test_rows_compare_users() {
        let sim = SimilarityMatrix::compute(&dense(), Axis::Rows);
        let expected = cosine_similarity(&[5.0, 1.0, 0.0], &[4.0, 2.0, 0.0]);

        assert_eq!(sim.ids(), &[1, 2]);
        assert!((sim.get(1, 2).unwrap() - expected).abs() < EPS);
        assert_eq!(sim.get(1, 1), Some(1.0));
    }

    #[test]
    fn test_symmetric_with_unit_diagonal() {
        let vectors = vec![
            vec![1.0, 2.0, 0.0, 4.0],
            vec![0.5, 0.0, 3.0, 1.0],
            vec![2.0, 2.0, 2.0, 2.0],
            vec![4.0, 0.0, 0.0, 0.5],
        ];
        let sim = SimilarityMatrix::from_vectors(vec![10, 20, 30, 40], &vectors);

        for &a in sim.ids() {
            assert_eq!(sim.get(a, a), Some(1.0));
            for &b in sim.ids() {
                let ab = sim.get(a, b).unwrap();
                assert_eq!(ab, sim.get(b, a).unwrap());
                assert!((-1.0..=1.0).contains(&ab));
            }
        }
    }

    #[test]
    fn test_ranked_excludes_self_and_sorts_descending() {
        let vectors = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
        ];
        let sim = SimilarityMatrix::from_vectors(vec![1, 2, 3, 4], &vectors);

        // movie 2 ties movie 1's self-similarity but self is still skipped
        let ranked = sim.ranked(2);
        let ids: Vec<u32> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 4, 3]);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_ranked_ties_keep_matrix_order() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0]];
        let sim = SimilarityMatrix::from_vectors(vec![1, 7, 3, 5], &vectors);
        let ids: Vec<u32> = sim.ranked(1).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn test_from_ratings_matches_dense_fill() {
        use data_loader::Rating;

        let ratings = vec![
            Rating::new(1, 10, 4.0),
            Rating::new(1, 30, 2.5),
            Rating::new(2, 10, 5.0),
            Rating::new(2, 20, 1.0),
            Rating::new(3, 20, 3.0),
            Rating::new(3, 30, 4.5),
            Rating::new(3, 40, 0.5),
            Rating::new(4, 40, 2.0),
        ];
        let matrix = UserMovieMatrix::build(&ratings);
        let dense = matrix.filled();

        for axis in [Axis::Rows, Axis::Columns] {
            let sparse = SimilarityMatrix::from_ratings(&matrix, axis);
            let filled = SimilarityMatrix::compute(&dense, axis);
            assert_eq!(sparse.ids(), filled.ids());

            for &a in sparse.ids() {
                for &b in sparse.ids() {
                    let got = sparse.get(a, b).unwrap();
                    assert!((got - filled.get(a, b).unwrap()).abs() < EPS, "{axis:?} ({a}, {b})");
                }
            }
        }
    }

    #[test]
    fn test_matrix_agrees_with_pairwise_cosine() {
        let vectors = vec![
            vec![0.0, 3.0, 0.0, 1.5, 0.0],
            vec![2.0, 0.0, 0.0, 4.0, 1.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0],
            vec![5.0, 1.0, 0.0, 0.0, 0.5],
        ];
        let sim = SimilarityMatrix::from_vectors(vec![1, 2, 3, 4], &vectors);

        for i in 0..vectors.len() {
            for j in (i + 1)..vectors.len() {
                let expected = cosine_similarity(&vectors[i], &vectors[j]);
                let got = sim.get(i as u32 + 1, j as u32 + 1).unwrap();
                assert!((got - expected).abs() < EPS);
            }
        }
        assert_eq!(sim.get(3, 3), Some(0.0));
    }

    #[test]
    fn test_unknown_ids() {
        let sim = SimilarityMatrix::compute(&dense(), Axis::Rows);
        assert!(!sim.contains(9));
        assert!(sim.get(1, 9).is_none());
        assert!(sim.ranked(9).is_empty());
    }
}
