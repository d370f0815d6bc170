//! Distance-based estimates of the remaining plan duration.
//!
//! # Algorithm
//!
//! For every unfinished package the shortest distance from where the package
//! physically is (its location, or its carrier's location) to its target is
//! looked up in the [`DistanceMatrix`]. [`HeuristicKind`] decides how these
//! distances and the remaining pick-ups and drops are combined.
//!
//! The distance sums are not a certified lower bound: two packages riding
//! in the same vehicle each pay for the shared trip. A* over these estimates
//! therefore gives good plans, but optimality is not guaranteed.

use std::collections::HashMap;
use std::sync::Arc;

use super::HeuristicKind;
use crate::distance::DistanceMatrix;
use crate::models::{Cost, StateKey, WorldState};

/// A memoizing heuristic over world states.
///
/// [`estimate`](Self::estimate) returns `None` for dead ends: states where
/// some package or vehicle can no longer reach its target.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_transport::distance::DistanceMatrix;
/// use u_transport::models::{PackageSpec, RoadNetwork, VehicleSpec, WorldState};
/// use u_transport::search::{Heuristic, HeuristicKind};
///
/// let network = RoadNetwork::builder()
///     .location("a", 0.0, 0.0)
///     .location("b", 1.0, 0.0)
///     .two_way_road("a", "b", 10)
///     .build()
///     .expect("valid network");
/// let distances = Arc::new(DistanceMatrix::compute(&network));
/// let state = WorldState::builder(Arc::new(network))
///     .vehicle(VehicleSpec::new("truck-1", "a", 2))
///     .package(PackageSpec::at("p1", "a", "b"))
///     .build()
///     .expect("valid problem");
///
/// let mut h = Heuristic::new(HeuristicKind::SumOfDistancesWithActions, distances);
/// assert_eq!(h.estimate(&state).map(|c| c.value()), Some(12));
/// ```
#[derive(Debug, Clone)]
pub struct Heuristic {
    kind: HeuristicKind,
    distances: Arc<DistanceMatrix>,
    memo: HashMap<StateKey, Option<Cost>>,
}

impl Heuristic {
    /// Creates a heuristic with an empty memo.
    pub fn new(kind: HeuristicKind, distances: Arc<DistanceMatrix>) -> Self {
        Self {
            kind,
            distances,
            memo: HashMap::new(),
        }
    }

    /// The configured kind.
    pub fn kind(&self) -> HeuristicKind {
        self.kind
    }

    /// Number of memoized states.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Estimates the remaining duration of `state`, memoized by its key.
    pub fn estimate(&mut self, state: &WorldState) -> Option<Cost> {
        let key = state.key();
        self.estimate_keyed(&key, state)
    }

    /// Like [`estimate`](Self::estimate) with a precomputed key.
    pub fn estimate_keyed(&mut self, key: &StateKey, state: &WorldState) -> Option<Cost> {
        if let Some(&h) = self.memo.get(key) {
            return h;
        }
        let h = self.evaluate(state);
        self.memo.insert(key.clone(), h);
        h
    }

    /// Computes the estimate without touching the memo.
    pub fn evaluate(&self, state: &WorldState) -> Option<Cost> {
        let mut total = Cost::ZERO;
        for package in state.unfinished_packages() {
            let carried = package.location().is_none();
            let distance = match state.package_position(package.id()) {
                Some(at) => self.distances.get(at, package.target())?,
                None => Cost::ZERO,
            };
            let actions = if carried { Cost::ONE } else { Cost::new(2) };
            total += match self.kind {
                HeuristicKind::SumOfDistances => distance,
                HeuristicKind::SumOfDistancesWithActions => distance + actions,
                HeuristicKind::ActionCount => actions,
            };
        }
        for vehicle in state.vehicles() {
            if let (Some(at), Some(target)) = (vehicle.location(), vehicle.target()) {
                if !self.distances.is_reachable(at, target) {
                    return None;
                }
            }
        }
        Some(total)
    }
}
