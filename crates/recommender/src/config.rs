//! Tunables for building a [`RecommenderContext`](crate::RecommenderContext).

use data_loader::DuplicatePolicy;

/// Number of neighbour users consulted by user-based recommendation
pub const DEFAULT_NEIGHBORHOOD_SIZE: usize = 10;

/// Number of rows returned when the caller does not ask for a specific count
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommenderConfig {
    /// Nearest users consulted when predicting ratings; independent of k
    pub neighborhood_size: usize,
    /// How the rating store treats a repeated (user, movie) pair
    pub duplicate_policy: DuplicatePolicy,
}

impl RecommenderConfig {
    pub fn new() -> Self {
        Self {
            neighborhood_size: DEFAULT_NEIGHBORHOOD_SIZE,
            duplicate_policy: DuplicatePolicy::LastWriteWins,
        }
    }

    /// Configure the neighbourhood size (default: 10)
    pub fn with_neighborhood_size(mut self, size: usize) -> Self {
        self.neighborhood_size = size;
        self
    }

    /// Configure the duplicate rating policy (default: last write wins)
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self::new()
    }
}
