//! Shortest road distances.
//!
//! Provides the all-pairs [`DistanceMatrix`] used by the heuristics, the
//! drive pruning rule and the randomized planner's routing.

mod matrix;

pub use matrix::DistanceMatrix;
