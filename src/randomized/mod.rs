//! Anytime planning by randomized restarts.
//!
//! [`RandomizedRestartPlanner`] builds complete plans greedily from random
//! choices, keeps the shortest one, and improves it until its restart budget
//! runs out or it is cancelled. It finds plans quickly on problems too large
//! for exhaustive search, without any optimality guarantee.

mod config;
mod restart;

pub use config::RandomizedConfig;
pub use restart::RandomizedRestartPlanner;
