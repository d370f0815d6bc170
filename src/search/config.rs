//! Search configuration.

use serde::{Deserialize, Serialize};

/// Estimate used to order the A* frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeuristicKind {
    /// Sum over unfinished packages of the shortest distance from where the
    /// package is to its target.
    #[default]
    SumOfDistances,
    /// [`SumOfDistances`](Self::SumOfDistances) plus one for every carried
    /// package (its drop) and two for every waiting package (pick-up and
    /// drop).
    SumOfDistancesWithActions,
    /// Only the remaining pick-ups and drops: one per carried package, two
    /// per waiting package.
    ActionCount,
}

/// Configuration shared by the search planners.
///
/// # Examples
///
/// ```
/// use u_transport::search::{HeuristicKind, SearchConfig};
///
/// let config = SearchConfig::default()
///     .with_heuristic(HeuristicKind::ActionCount)
///     .with_progress_interval(5_000);
/// assert_eq!(config.heuristic, HeuristicKind::ActionCount);
/// assert_eq!(config.progress_interval, 5_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Heuristic for A*; breadth-first search ignores it.
    pub heuristic: HeuristicKind,
    /// Expansions between progress reports; zero disables them.
    pub progress_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic: HeuristicKind::SumOfDistances,
            progress_interval: 100_000,
        }
    }
}

impl SearchConfig {
    /// Sets the heuristic.
    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Sets the progress interval.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub(crate) fn is_progress_step(&self, expanded: u64) -> bool {
        self.progress_interval > 0 && expanded % self.progress_interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.heuristic, HeuristicKind::SumOfDistances);
        assert_eq!(config.progress_interval, 100_000);
        assert!(config.is_progress_step(200_000));
        assert!(!config.is_progress_step(150_000));
    }

    #[test]
    fn test_zero_interval_disables_progress() {
        let config = SearchConfig::default().with_progress_interval(0);
        assert!(!config.is_progress_step(0));
        assert!(!config.is_progress_step(100_000));
    }
}
