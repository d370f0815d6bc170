//! Best-first A* search over world states.
//!
//! # Algorithm
//!
//! Nodes are ordered by `f = g + h`, where `g` is the accumulated action
//! duration of the node's trail and `h` the [`Heuristic`] estimate. Ties
//! prefer the smaller `h`, then the node discovered first.
//!
//! 1. Pop the best node; skip it if its state was already closed or has
//!    since been reached more cheaply.
//! 2. If it is a goal, stop. Otherwise stop if cancellation was requested.
//! 3. Close it and expand it with the [`ActionGenerator`]. A successor
//!    is queued when its state is not closed, no cheaper path to it is
//!    known, and the heuristic does not report a dead end.
//!
//! Improving a queued state pushes a fresh entry instead of re-ordering
//! the heap; the outdated one is skipped in step 1. Goal successors are
//! recorded as incumbents as soon as they are generated, so a cancelled
//! search can still return a plan.
//!
//! # Complexity
//!
//! Exponential in the worst case. Memory holds every generated node that has
//! not been popped yet plus one key per closed state.
//!
//! # Reference
//!
//! Hart, P. E., Nilsson, N. J. & Raphael, B. (1968). "A Formal Basis for the
//! Heuristic Determination of Minimum Cost Paths", *IEEE Transactions on
//! Systems Science and Cybernetics* 4(2), 100-107.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use super::planner::{finish, report_progress, PlannerControl};
use super::{
    ActionGenerator, CancellationToken, Heuristic, Planner, ProgressObserver, SearchConfig,
    SearchOutcome, SearchProgress, SearchStats, SearchStatus, Trail,
};
use crate::distance::DistanceMatrix;
use crate::domain::Domain;
use crate::error::PlanningError;
use crate::models::{Cost, StateKey, WorldState};

struct Node {
    state: WorldState,
    trail: Trail,
    key: StateKey,
}

/// A* planner.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_transport::domain::Domain;
/// use u_transport::models::{PackageSpec, RoadNetwork, VehicleSpec, WorldState};
/// use u_transport::search::{AstarPlanner, Planner, SearchStatus};
///
/// let network = RoadNetwork::builder()
///     .location("a", 0.0, 0.0)
///     .location("b", 1.0, 0.0)
///     .location("c", 2.0, 0.0)
///     .two_way_road("a", "b", 10)
///     .two_way_road("b", "c", 10)
///     .build()
///     .expect("valid network");
/// let state = WorldState::builder(Arc::new(network))
///     .vehicle(VehicleSpec::new("truck-1", "a", 2))
///     .package(PackageSpec::at("p1", "a", "c"))
///     .build()
///     .expect("valid problem");
///
/// let domain = Domain::sequential("transport");
/// let outcome = AstarPlanner::new().search(&domain, &state).expect("compatible");
///
/// assert_eq!(outcome.status, SearchStatus::GoalFound);
/// let plan = outcome.plan.expect("plan");
/// assert_eq!(plan.len(), 4);
/// assert_eq!(plan.total_duration().value(), 22);
/// ```
#[derive(Default)]
pub struct AstarPlanner {
    config: SearchConfig,
    observer: Option<ProgressObserver>,
    control: PlannerControl,
}

impl AstarPlanner {
    /// Creates a planner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets a callback invoked every `progress_interval` expansions.
    pub fn with_observer(mut self, observer: impl Fn(&SearchProgress) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// The search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches with a precomputed distance matrix for `problem`'s network.
    pub fn search_with_distances(
        &self,
        domain: &Domain,
        problem: &WorldState,
        distances: Arc<DistanceMatrix>,
    ) -> Result<SearchOutcome, PlanningError> {
        let _running = self.control.start();
        domain.check_problem(problem)?;
        Ok(self.run(domain, problem, distances))
    }

    fn run(&self, domain: &Domain, problem: &WorldState, distances: Arc<DistanceMatrix>) -> SearchOutcome {
        let token = self.control.token();
        let started = Instant::now();
        tracing::debug!(
            planner = self.name(),
            domain = domain.name(),
            vehicles = problem.num_vehicles(),
            packages = problem.num_packages(),
            heuristic = ?self.config.heuristic,
            "search started"
        );

        let generator = ActionGenerator::new(domain, &distances);
        let mut heuristic = Heuristic::new(self.config.heuristic, Arc::clone(&distances));
        let mut stats = SearchStats::default();
        let mut best: Option<Trail> = None;

        let root_key = problem.key();
        let Some(h0) = heuristic.estimate_keyed(&root_key, problem) else {
            return finish(self.name(), SearchStatus::Exhausted, None, stats, started);
        };

        let mut nodes = vec![Some(Node {
            state: problem.clone(),
            trail: Trail::new(),
            key: root_key.clone(),
        })];
        let mut open = BinaryHeap::new();
        open.push(Reverse((h0, h0, 0usize)));
        let mut g_score: HashMap<StateKey, Cost> = HashMap::from([(root_key, Cost::ZERO)]);
        let mut closed: HashSet<StateKey> = HashSet::new();

        let status = loop {
            let Some(Reverse((_, _, index))) = open.pop() else {
                break SearchStatus::Exhausted;
            };
            let Some(node) = nodes[index].take() else {
                continue;
            };
            let g = node.trail.duration();
            if closed.contains(&node.key) || g_score.get(&node.key).is_some_and(|&known| known < g) {
                continue;
            }
            if node.state.is_goal() {
                best = Some(node.trail);
                break SearchStatus::GoalFound;
            }
            if token.is_cancelled() {
                break SearchStatus::Cancelled;
            }

            closed.insert(node.key.clone());
            stats.expanded += 1;
            if self.config.is_progress_step(stats.expanded) {
                let progress = SearchProgress {
                    stats: SearchStats {
                        elapsed: started.elapsed(),
                        ..stats
                    },
                    frontier: open.len(),
                    best_cost: best.as_ref().map(Trail::duration),
                };
                report_progress(self.name(), self.observer.as_ref(), &progress);
            }

            for action in generator.generate(&node.state, &node.trail) {
                let next = node.state.apply(&action);
                stats.generated += 1;
                let key = next.key();
                let next_g = g + action.duration();
                if closed.contains(&key) || g_score.get(&key).is_some_and(|&known| next_g >= known) {
                    stats.duplicates += 1;
                    continue;
                }
                let Some(h) = heuristic.estimate_keyed(&key, &next) else {
                    continue;
                };

                let trail = node.trail.push(action);
                if next.is_goal() && best.as_ref().is_none_or(|b| next_g < b.duration()) {
                    tracing::info!(planner = self.name(), duration = next_g.value(), "new incumbent plan");
                    best = Some(trail.clone());
                }
                g_score.insert(key.clone(), next_g);
                open.push(Reverse((next_g + h, h, nodes.len())));
                nodes.push(Some(Node {
                    state: next,
                    trail,
                    key,
                }));
            }
        };

        finish(
            self.name(),
            status,
            best.map(|trail| trail.to_plan()),
            stats,
            started,
        )
    }
}

impl Planner for AstarPlanner {
    fn name(&self) -> &str {
        "astar"
    }

    fn search(&self, domain: &Domain, problem: &WorldState) -> Result<SearchOutcome, PlanningError> {
        let _running = self.control.start();
        domain.check_problem(problem)?;
        let distances = Arc::new(DistanceMatrix::compute(problem.network()));
        Ok(self.run(domain, problem, distances))
    }

    fn cancel(&self) -> bool {
        self.control.cancel()
    }

    fn is_planning(&self) -> bool {
        self.control.is_planning()
    }

    fn cancellation_token(&self) -> CancellationToken {
        self.control.token().clone()
    }
}
