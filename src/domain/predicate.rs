//! Predicates checked before and after actions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Action, ActionKind};
use crate::models::WorldState;

/// When a predicate must hold relative to its action.
///
/// Sequential planning treats every quantifier the same way; the tag is kept
/// so rule sets can still be written for temporal domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemporalQuantifier {
    /// Must hold when the action starts.
    AtStart,
    /// Must hold when the action ends.
    AtEnd,
    /// Must hold for the whole action.
    OverAll,
}

/// A boolean condition over a state and the action being checked.
///
/// The names follow the action's roles: *who* is the vehicle, *where* the
/// location the action starts at, and *what* either the package (pick-up,
/// drop) or the destination (drive).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// The vehicle is at the action's location.
    WhoAtWhere,
    /// The vehicle is at the drive's destination.
    WhoAtWhat,
    /// The package lies at the action's location.
    WhatAtWhere,
    /// The package is in the vehicle's cargo.
    WhatInWho,
    /// The drive's road connects its location to its destination.
    IsRoad,
    /// The vehicle has room for the package.
    HasCapacity,
    /// The action's location has a petrol station.
    HasPetrolStation,
    /// No pick-up or drop is in progress on the vehicle.
    ReadyLoading,
    /// The vehicle has enough fuel for the drive.
    HasFuelForDrive,
    /// Negation.
    Not(Box<Condition>),
}

impl Condition {
    /// Wraps the condition in a negation.
    pub fn negated(self) -> Condition {
        Condition::Not(Box::new(self))
    }

    /// Evaluates the condition.
    ///
    /// Conditions that need a role the action does not have (a package for a
    /// drive, a destination for a pick-up) are false.
    pub fn holds(&self, state: &WorldState, action: &Action) -> bool {
        let vehicle = state.vehicle(action.vehicle());
        match self {
            Condition::WhoAtWhere => vehicle.location() == Some(action.location()),
            Condition::WhoAtWhat => action
                .destination()
                .is_some_and(|to| vehicle.location() == Some(to)),
            Condition::WhatAtWhere => action
                .package()
                .is_some_and(|p| state.package(p).location() == Some(action.location())),
            Condition::WhatInWho => action.package().is_some_and(|p| vehicle.carries(p)),
            Condition::IsRoad => match *action.kind() {
                ActionKind::Drive { road, to, .. } => state
                    .network()
                    .shortest_edge(action.location(), to)
                    .is_some_and(|r| r.id() == road),
                _ => false,
            },
            Condition::HasCapacity => action
                .package()
                .is_some_and(|p| state.package(p).size() <= vehicle.current_capacity()),
            Condition::HasPetrolStation => state
                .network()
                .location(action.location())
                .has_petrol_station(),
            Condition::ReadyLoading => vehicle.is_ready_loading(),
            Condition::HasFuelForDrive => match (action.kind(), vehicle.current_fuel()) {
                (ActionKind::Drive { fuel: None, .. }, _) => true,
                (ActionKind::Drive { fuel: Some(burn), .. }, Some(current)) => current >= *burn,
                _ => false,
            },
            Condition::Not(inner) => !inner.holds(state, action),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::WhoAtWhere => "who-at-where",
            Condition::WhoAtWhat => "who-at-what",
            Condition::WhatAtWhere => "what-at-where",
            Condition::WhatInWho => "what-in-who",
            Condition::IsRoad => "is-road",
            Condition::HasCapacity => "has-capacity",
            Condition::HasPetrolStation => "has-petrol-station",
            Condition::ReadyLoading => "ready-loading",
            Condition::HasFuelForDrive => "has-fuel-for-drive",
            Condition::Not(inner) => return write!(f, "not({inner})"),
        };
        f.write_str(name)
    }
}

/// A [`Condition`] tagged with its [`TemporalQuantifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    condition: Condition,
    quantifier: TemporalQuantifier,
}

impl Predicate {
    /// Creates a predicate.
    pub fn new(condition: Condition, quantifier: TemporalQuantifier) -> Self {
        Self {
            condition,
            quantifier,
        }
    }

    /// The checked condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// When the condition applies.
    pub fn quantifier(&self) -> TemporalQuantifier {
        self.quantifier
    }

    /// Evaluates the condition; the quantifier is not consulted.
    pub fn holds(&self, state: &WorldState, action: &Action) -> bool {
        self.condition.holds(state, action)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.quantifier {
            TemporalQuantifier::AtStart => "at start",
            TemporalQuantifier::AtEnd => "at end",
            TemporalQuantifier::OverAll => "over all",
        };
        write!(f, "{tag} {}", self.condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::fixtures;
    use crate::models::{Cost, PackageId, VehicleId};

    #[test]
    fn test_pick_up_conditions() {
        let domain = Domain::sequential("transport");
        let state = fixtures::two_truck_state();
        let truck = VehicleId::new(0);
        let p1 = PackageId::new(0);
        let action = domain.pick_up(&state, truck, p1);

        assert!(Condition::WhoAtWhere.holds(&state, &action));
        assert!(Condition::WhatAtWhere.holds(&state, &action));
        assert!(Condition::HasCapacity.holds(&state, &action));
        assert!(!Condition::WhatInWho.holds(&state, &action));
        assert!(Condition::WhatInWho.negated().holds(&state, &action));
        // No destination on a pick-up.
        assert!(!Condition::WhoAtWhat.holds(&state, &action));
        assert!(!Condition::IsRoad.holds(&state, &action));
    }

    #[test]
    fn test_has_capacity_uses_spare_room() {
        let domain = Domain::sequential("transport");
        let state = fixtures::two_truck_state();
        let truck = state.vehicle(VehicleId::new(0)).clone();
        let full = state.with_vehicle(truck.with_loaded(PackageId::new(1), Cost::new(4)));
        let action = domain.pick_up(&full, VehicleId::new(0), PackageId::new(0));
        assert!(!Condition::HasCapacity.holds(&full, &action));
    }

    #[test]
    fn test_drive_conditions() {
        let domain = Domain::sequential("transport");
        let state = fixtures::two_truck_state();
        let net = state.network().clone();
        let truck = VehicleId::new(0);
        let action = domain
            .drive_between(
                &state,
                truck,
                net.resolve("L1").expect("L1"),
                net.resolve("L2").expect("L2"),
            )
            .expect("road");

        assert!(Condition::IsRoad.holds(&state, &action));
        assert!(Condition::HasFuelForDrive.holds(&state, &action));
        assert!(!Condition::WhoAtWhat.holds(&state, &action));
        let after = state.apply(&action);
        assert!(Condition::WhoAtWhat.holds(&after, &action));
        assert!(!Condition::WhoAtWhere.holds(&after, &action));
    }

    #[test]
    fn test_fuel_and_petrol_conditions() {
        let domain = Domain::builder("fuel").fuel(true).build();
        let net_state = fixtures::fuel_state(9);
        let net = net_state.network().clone();
        let drive = domain
            .drive_between(
                &net_state,
                VehicleId::new(0),
                net.resolve("A").expect("A"),
                net.resolve("B").expect("B"),
            )
            .expect("road");
        assert!(!Condition::HasFuelForDrive.holds(&net_state, &drive));
        assert!(Condition::HasPetrolStation.holds(&net_state, &drive));

        let enough = fixtures::fuel_state(10);
        assert!(Condition::HasFuelForDrive.holds(&enough, &drive));
    }

    #[test]
    fn test_display() {
        let p = Predicate::new(
            Condition::WhatAtWhere.negated(),
            TemporalQuantifier::AtEnd,
        );
        assert_eq!(p.to_string(), "at end not(what-at-where)");
        assert_eq!(p.quantifier(), TemporalQuantifier::AtEnd);
    }
}
