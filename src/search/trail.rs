//! Persistent action history of a search node.

use std::sync::Arc;

use crate::domain::Action;
use crate::models::{Cost, Plan};

#[derive(Debug)]
struct TrailNode {
    action: Action,
    prev: Option<Arc<TrailNode>>,
}

/// The actions that led from the initial state to a search node.
///
/// Trails are persistent singly linked lists: extending a trail shares the
/// whole prefix with its parent, so every frontier node can keep its own
/// history cheaply. The accumulated duration is the node's cost so far.
///
/// # Examples
///
/// ```
/// use u_transport::search::Trail;
///
/// let trail = Trail::new();
/// assert!(trail.is_empty());
/// assert_eq!(trail.duration().value(), 0);
/// assert!(trail.to_plan().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Trail {
    head: Option<Arc<TrailNode>>,
    len: usize,
    duration: Cost,
}

impl Trail {
    /// The empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a trail extended by `action`; `self` is unchanged.
    pub fn push(&self, action: Action) -> Trail {
        let duration = self.duration + action.duration();
        Trail {
            head: Some(Arc::new(TrailNode {
                action,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
            duration,
        }
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no action was taken yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sum of action durations.
    pub fn duration(&self) -> Cost {
        self.duration
    }

    /// The most recent action.
    pub fn last(&self) -> Option<&Action> {
        self.head.as_deref().map(|n| &n.action)
    }

    /// Actions from the most recent to the first.
    pub fn iter_rev(&self) -> impl Iterator<Item = &Action> + '_ {
        std::iter::successors(self.head.as_deref(), |n| n.prev.as_deref()).map(|n| &n.action)
    }

    /// Materializes the trail as a plan in execution order.
    pub fn to_plan(&self) -> Plan {
        let mut actions: Vec<Action> = self.iter_rev().cloned().collect();
        actions.reverse();
        Plan::new(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::fixtures;
    use crate::models::{PackageId, VehicleId};

    #[test]
    fn test_push_shares_prefix() {
        let domain = Domain::sequential("transport");
        let state = fixtures::two_truck_state();
        let pick1 = domain.pick_up(&state, VehicleId::new(0), PackageId::new(0));
        let pick2 = domain.pick_up(&state, VehicleId::new(1), PackageId::new(1));

        let root = Trail::new().push(pick1.clone());
        let a = root.push(pick2.clone());
        let b = root.push(pick2);

        assert_eq!(root.len(), 1);
        assert_eq!(a.len(), 2);
        assert_eq!(a.duration(), Cost::new(2));
        assert_eq!(a.last().map(|x| x.vehicle()), Some(VehicleId::new(1)));
        assert!(Arc::ptr_eq(
            a.head.as_ref().and_then(|n| n.prev.as_ref()).expect("prefix"),
            b.head.as_ref().and_then(|n| n.prev.as_ref()).expect("prefix"),
        ));

        let plan = a.to_plan();
        assert_eq!(plan.actions()[0], pick1);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_iter_rev_order() {
        let domain = Domain::sequential("transport");
        let state = fixtures::two_truck_state();
        let plan = fixtures::optimal_plan(&domain, &state);
        let trail = plan
            .actions()
            .iter()
            .cloned()
            .fold(Trail::new(), |t, a| t.push(a));
        let names: Vec<String> = trail.iter_rev().map(|a| a.to_string()).collect();
        assert_eq!(names.first().map(String::as_str), Some("drop[truck-2 @ L5: p2]"));
        assert_eq!(trail.duration(), Cost::new(54));
        assert_eq!(trail.to_plan(), plan);
    }
}
