//! Breadth-first search over world states.
//!
//! Explores states in order of action count. Successors of a node are
//! enqueued sorted by their accumulated duration, so among plans with the
//! same number of actions the shorter ones tend to be found first. States
//! are marked visited when enqueued; the goal test runs when a node is
//! dequeued, before the cancellation check.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use super::planner::{finish, report_progress, PlannerControl};
use super::{
    ActionGenerator, CancellationToken, Planner, ProgressObserver, SearchConfig, SearchOutcome,
    SearchProgress, SearchStats, SearchStatus, Trail,
};
use crate::distance::DistanceMatrix;
use crate::domain::Domain;
use crate::error::PlanningError;
use crate::models::{StateKey, WorldState};

/// Breadth-first planner.
///
/// Uses the same successor generation and pruning as
/// [`AstarPlanner`](super::AstarPlanner) but ignores the heuristic.
#[derive(Default)]
pub struct BfsPlanner {
    config: SearchConfig,
    observer: Option<ProgressObserver>,
    control: PlannerControl,
}

impl BfsPlanner {
    /// Creates a planner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search configuration; only the progress interval is used.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets a callback invoked every `progress_interval` expansions.
    pub fn with_observer(mut self, observer: impl Fn(&SearchProgress) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
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
            "search started"
        );

        let generator = ActionGenerator::new(domain, &distances);
        let mut stats = SearchStats::default();
        let mut best: Option<Trail> = None;
        let mut visited: HashSet<StateKey> = HashSet::from([problem.key()]);
        let mut frontier = VecDeque::from([(problem.clone(), Trail::new())]);

        let status = loop {
            let Some((state, trail)) = frontier.pop_front() else {
                break SearchStatus::Exhausted;
            };
            if state.is_goal() {
                best = Some(trail);
                break SearchStatus::GoalFound;
            }
            if token.is_cancelled() {
                break SearchStatus::Cancelled;
            }

            stats.expanded += 1;
            if self.config.is_progress_step(stats.expanded) {
                let progress = SearchProgress {
                    stats: SearchStats {
                        elapsed: started.elapsed(),
                        ..stats
                    },
                    frontier: frontier.len(),
                    best_cost: best.as_ref().map(Trail::duration),
                };
                report_progress(self.name(), self.observer.as_ref(), &progress);
            }

            let mut successors = Vec::new();
            for action in generator.generate(&state, &trail) {
                let next = state.apply(&action);
                stats.generated += 1;
                if !visited.insert(next.key()) {
                    stats.duplicates += 1;
                    continue;
                }
                let next_trail = trail.push(action);
                if next.is_goal() && best.as_ref().is_none_or(|b| next_trail.duration() < b.duration()) {
                    best = Some(next_trail.clone());
                }
                successors.push((next, next_trail));
            }
            successors.sort_by_key(|(_, t)| t.duration());
            frontier.extend(successors);
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

impl Planner for BfsPlanner {
    fn name(&self) -> &str {
        "bfs"
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
