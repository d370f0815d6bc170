//! Forward state-space search.
//!
//! Planners start from an initial [`WorldState`](crate::models::WorldState)
//! and apply generated actions until every package is at its target:
//!
//! - [`AstarPlanner`]: best-first by accumulated duration plus a
//!   [`Heuristic`] estimate.
//! - [`BfsPlanner`]: breadth-first by action count.
//!
//! Both share the [`ActionGenerator`] successor function, record each
//! node's history as a persistent [`Trail`], and poll a
//! [`CancellationToken`] between expansions.

mod astar;
mod bfs;
mod cancel;
mod config;
mod generator;
mod heuristic;
mod outcome;
mod planner;
mod trail;

pub use astar::AstarPlanner;
pub use bfs::BfsPlanner;
pub use cancel::CancellationToken;
pub use config::{HeuristicKind, SearchConfig};
pub use generator::ActionGenerator;
pub use heuristic::Heuristic;
pub use outcome::{SearchOutcome, SearchProgress, SearchStats, SearchStatus};
pub use planner::{Planner, ProgressObserver};
pub(crate) use planner::{finish, PlannerControl};
pub use trail::Trail;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::domain::{ActionKind, Domain};
    use crate::evaluation::PlanValidator;
    use crate::models::{PackageSpec, Plan, RoadNetwork, VehicleSpec, WorldState};

    /// Up to four locations joined by random two-way roads, one or two
    /// vehicles and one or two unit-size packages.
    fn arb_problem() -> impl Strategy<Value = WorldState> {
        (2usize..5).prop_flat_map(|n| {
            (
                prop::collection::vec((0..n, 0..n, 1i32..20), 1..(n * 2)),
                prop::collection::vec((0..n, 1i32..3), 1..3),
                prop::collection::vec((0..n, 0..n), 1..3),
            )
                .prop_map(move |(roads, vehicles, packages)| {
                    let mut builder = RoadNetwork::builder();
                    for i in 0..n {
                        builder = builder.location(format!("v{i}"), i as f64, 0.0);
                    }
                    let mut seen = HashSet::new();
                    for (a, b, length) in roads {
                        if a != b && seen.insert((a.min(b), a.max(b))) {
                            builder = builder.two_way_road(format!("v{a}"), format!("v{b}"), length);
                        }
                    }
                    let network = builder.build().expect("generated network is valid");

                    let mut problem = WorldState::builder(Arc::new(network));
                    for (i, (at, capacity)) in vehicles.into_iter().enumerate() {
                        problem = problem.vehicle(VehicleSpec::new(format!("t{i}"), format!("v{at}"), capacity));
                    }
                    for (i, (from, to)) in packages.into_iter().enumerate() {
                        problem = problem.package(PackageSpec::at(format!("p{i}"), format!("v{from}"), format!("v{to}")));
                    }
                    problem.build().expect("generated problem is valid")
                })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_planners_are_repeatable_and_sound(state in arb_problem()) {
            let domain = Domain::sequential("transport");
            let validator = PlanValidator::new(&domain);
            let astar = AstarPlanner::new();
            let bfs = BfsPlanner::new();
            let planners: [&dyn Planner; 2] = [&astar, &bfs];

            for planner in planners {
                let first = planner.search(&domain, &state).expect("compatible");
                let second = planner.search(&domain, &state).expect("compatible");
                prop_assert!(first.status.is_terminal());
                prop_assert_eq!(first.status, second.status);
                prop_assert_eq!(
                    first.plan.as_ref().map(|p| p.to_string()),
                    second.plan.as_ref().map(|p| p.to_string())
                );

                let Some(plan) = first.plan else {
                    prop_assert_eq!(first.status, SearchStatus::Exhausted);
                    continue;
                };
                prop_assert_eq!(first.status, SearchStatus::GoalFound);
                prop_assert!(validator.validate(&state, &plan).reaches_goal());

                // Without its first pick-up the package's drop has nothing to unload.
                let mut actions = plan.into_actions();
                if let Some(i) = actions.iter().position(|a| matches!(a.kind(), ActionKind::PickUp { .. })) {
                    actions.remove(i);
                    prop_assert!(!validator.validate(&state, &Plan::new(actions)).is_valid());
                }
            }
        }
    }
}
