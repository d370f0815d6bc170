//! Sequential plan type.

use std::fmt;

use super::Cost;
use crate::domain::Action;

/// An action placed on the sequential time line of a [`Plan`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledAction<'a> {
    /// Time the action starts.
    pub start: Cost,
    /// Time the action ends.
    pub end: Cost,
    /// The action itself.
    pub action: &'a Action,
}

/// An ordered sequence of actions produced by a planner.
///
/// Actions run one after the other, so the plan's makespan equals the sum of
/// action durations.
///
/// # Examples
///
/// ```
/// use u_transport::models::Plan;
///
/// let plan = Plan::new(Vec::new());
/// assert!(plan.is_empty());
/// assert_eq!(plan.total_duration().value(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    actions: Vec<Action>,
}

impl Plan {
    /// Wraps an action sequence.
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// The actions, in execution order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Consumes the plan, returning its actions.
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the plan has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Sum of action durations.
    pub fn total_duration(&self) -> Cost {
        self.actions.iter().map(Action::duration).sum()
    }

    /// Sum of action costs.
    pub fn total_cost(&self) -> Cost {
        self.actions.iter().map(Action::cost).sum()
    }

    /// Start and end times of every action, back to back from time zero.
    pub fn timeline(&self) -> Vec<ScheduledAction<'_>> {
        let mut clock = Cost::ZERO;
        self.actions
            .iter()
            .map(|action| {
                let start = clock;
                clock += action.duration();
                ScheduledAction {
                    start,
                    end: clock,
                    action,
                }
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in self.timeline() {
            writeln!(f, "{}: {} [{}]", step.start, step.action, step.action.duration())?;
        }
        Ok(())
    }
}
