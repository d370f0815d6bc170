//! Randomized restart configuration.

use serde::{Deserialize, Serialize};

/// Configuration of [`RandomizedRestartPlanner`](super::RandomizedRestartPlanner).
///
/// # Examples
///
/// ```
/// use u_transport::randomized::RandomizedConfig;
///
/// let config = RandomizedConfig::default().with_seed(7).with_max_restarts(50);
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.max_restarts, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizedConfig {
    /// Seed of the random generator; equal seeds give equal plans.
    pub seed: u64,
    /// Number of restarts before the best plan is returned.
    pub max_restarts: usize,
}

impl Default for RandomizedConfig {
    fn default() -> Self {
        Self {
            seed: 2017,
            max_restarts: 1000,
        }
    }
}

impl RandomizedConfig {
    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the restart budget.
    pub fn with_max_restarts(mut self, max_restarts: usize) -> Self {
        self.max_restarts = max_restarts;
        self
    }
}
