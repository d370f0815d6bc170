//! Search results, counters and progress snapshots.

use std::fmt;
use std::time::Duration;

use crate::models::{Cost, Plan};

/// Lifecycle of a search.
///
/// A finished search reports one of the terminal states [`GoalFound`],
/// [`Exhausted`] or [`Cancelled`]. `Initialized` and `Running` are never
/// returned in a [`SearchOutcome`]; they describe a search that has not
/// ended, for callers tracking planners they drive themselves.
///
/// [`GoalFound`]: SearchStatus::GoalFound
/// [`Exhausted`]: SearchStatus::Exhausted
/// [`Cancelled`]: SearchStatus::Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// Created but not started.
    Initialized,
    /// Expanding nodes.
    Running,
    /// A goal state was popped from the frontier.
    GoalFound,
    /// The frontier ran empty without reaching a goal.
    Exhausted,
    /// Cancellation was requested before a goal was popped.
    Cancelled,
}

impl SearchStatus {
    /// Returns `true` for the states a finished search reports.
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchStatus::GoalFound | SearchStatus::Exhausted | SearchStatus::Cancelled)
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchStatus::Initialized => "initialized",
            SearchStatus::Running => "running",
            SearchStatus::GoalFound => "goal found",
            SearchStatus::Exhausted => "exhausted",
            SearchStatus::Cancelled => "cancelled",
        })
    }
}

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped and expanded.
    pub expanded: u64,
    /// Successor states produced by applying generated actions.
    pub generated: u64,
    /// Successors discarded because their state was already closed or
    /// reached at no greater cost.
    pub duplicates: u64,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
}

/// Snapshot handed to progress observers.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchProgress {
    /// Counters so far.
    pub stats: SearchStats,
    /// Number of nodes waiting in the frontier.
    pub frontier: usize,
    /// Cost of the best goal plan found so far.
    pub best_cost: Option<Cost>,
}

/// Result of a search run.
///
/// A plan may be present even when the status is not
/// [`SearchStatus::GoalFound`]: an interrupted or exhausted search returns
/// the best complete plan it discovered along the way.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best plan found, if any.
    pub plan: Option<Plan>,
    /// How the search ended.
    pub status: SearchStatus,
    /// Final counters.
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Returns `true` if the search proved its plan by popping a goal.
    pub fn is_goal_found(&self) -> bool {
        self.status == SearchStatus::GoalFound
    }

    /// Total duration of the returned plan.
    pub fn plan_duration(&self) -> Option<Cost> {
        self.plan.as_ref().map(Plan::total_duration)
    }
}
