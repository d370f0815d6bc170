//! The planner interface shared by every search strategy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::{CancellationToken, SearchOutcome, SearchProgress, SearchStats, SearchStatus};
use crate::domain::Domain;
use crate::error::PlanningError;
use crate::models::{Plan, WorldState};

/// Callback invoked with periodic search progress.
pub type ProgressObserver = Arc<dyn Fn(&SearchProgress) + Send + Sync>;

/// A planner that turns a domain and an initial state into a plan.
///
/// Planners are cancellable from other threads: [`cancel`](Self::cancel)
/// sets the planner's [`CancellationToken`], which the running search polls
/// once per iteration. A cancelled search still returns the best plan it
/// found so far.
pub trait Planner: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Runs the search and reports how it ended.
    fn search(&self, domain: &Domain, problem: &WorldState) -> Result<SearchOutcome, PlanningError>;

    /// Returns the best plan found, or `None` if no plan was found or the
    /// domain cannot plan this problem.
    fn plan(&self, domain: &Domain, problem: &WorldState) -> Option<Plan> {
        match self.search(domain, problem) {
            Ok(outcome) => outcome.plan,
            Err(err) => {
                tracing::error!(planner = self.name(), domain = domain.name(), error = %err, "planning failed");
                None
            }
        }
    }

    /// Requests cancellation; returns whether a search was running.
    ///
    /// A request made while idle stops the next search instead.
    fn cancel(&self) -> bool;

    /// Returns `true` while a search is running.
    fn is_planning(&self) -> bool;

    /// A handle to the planner's cancellation flag.
    fn cancellation_token(&self) -> CancellationToken;
}

/// Cancellation flag and running state of one planner.
///
/// The token is cleared when a search returns. A request made while no
/// search runs stays pending and stops the next search before its first
/// expansion.
#[derive(Debug, Default)]
pub(crate) struct PlannerControl {
    token: CancellationToken,
    planning: AtomicBool,
}

impl PlannerControl {
    pub(crate) fn start(&self) -> PlanningGuard<'_> {
        self.planning.store(true, Ordering::SeqCst);
        PlanningGuard { control: self }
    }

    pub(crate) fn cancel(&self) -> bool {
        self.token.cancel();
        self.is_planning()
    }

    pub(crate) fn is_planning(&self) -> bool {
        self.planning.load(Ordering::SeqCst)
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Clears the cancellation request and the running flag when a search
/// returns.
pub(crate) struct PlanningGuard<'a> {
    control: &'a PlannerControl,
}

impl Drop for PlanningGuard<'_> {
    fn drop(&mut self) {
        self.control.token.reset();
        self.control.planning.store(false, Ordering::SeqCst);
    }
}

/// Logs a progress snapshot and hands it to the observer.
pub(crate) fn report_progress(
    planner: &str,
    observer: Option<&ProgressObserver>,
    progress: &SearchProgress,
) {
    tracing::info!(
        planner,
        expanded = progress.stats.expanded,
        generated = progress.stats.generated,
        frontier = progress.frontier,
        best = ?progress.best_cost.map(|c| c.value()),
        "search progress"
    );
    if let Some(observer) = observer {
        observer(progress);
    }
}

/// Stamps the elapsed time, logs the result and builds the outcome.
pub(crate) fn finish(
    planner: &str,
    status: SearchStatus,
    plan: Option<Plan>,
    mut stats: SearchStats,
    started: Instant,
) -> SearchOutcome {
    stats.elapsed = started.elapsed();
    tracing::debug!(
        planner,
        %status,
        expanded = stats.expanded,
        generated = stats.generated,
        duplicates = stats.duplicates,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        plan_len = plan.as_ref().map(|p| p.len()),
        "search finished"
    );
    SearchOutcome { plan, status, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_lifecycle() {
        let control = PlannerControl::default();
        assert!(!control.is_planning());

        {
            let _guard = control.start();
            assert!(control.is_planning());
            assert!(!control.token().is_cancelled());
            assert!(control.cancel());
            assert!(control.token().is_cancelled());
        }
        assert!(!control.is_planning());
        assert!(!control.token().is_cancelled());
    }

    #[test]
    fn test_pending_request_survives_start() {
        let control = PlannerControl::default();
        assert!(!control.cancel());

        let guard = control.start();
        assert!(control.token().is_cancelled());
        drop(guard);
        assert!(!control.token().is_cancelled());
    }
}
