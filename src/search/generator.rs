//! Successor generation with history-based pruning.
//!
//! # Algorithm
//!
//! The generator enumerates pick-ups, drops, refuels and drives for a state,
//! then prunes moves that can never be part of a useful plan given the
//! actions that led to the state:
//!
//! 1. A trailing run of drives that revisits a location ends the branch.
//! 2. A carried package whose vehicle stands at its target is dropped
//!    before anything else is considered.
//! 3. After a drive only the vehicle that drove may pick up or drop, and
//!    nothing is dropped right after a pick-up.
//! 4. A vehicle does not re-load a package it dropped since its last drive,
//!    nor one it dropped earlier without ever running out of room since.
//! 5. A package is never dropped where it was picked up before.
//! 6. After a drive, pick-up or refuel only the same vehicle may drive on,
//!    unless it is empty and either stands at its own target or has no
//!    waiting package left to reach. Drives that extend a vehicle's trailing
//!    run beyond a shortest path are skipped.
//!
//! Every returned action satisfies its preconditions in the given state.

use std::collections::HashSet;

use super::Trail;
use crate::distance::DistanceMatrix;
use crate::domain::{Action, ActionKind, Domain};
use crate::models::{Cost, LocationId, PackageId, Road, VehicleId, WorldState};

/// Successor function of the forward search.
pub struct ActionGenerator<'a> {
    domain: &'a Domain,
    distances: &'a DistanceMatrix,
}

impl<'a> ActionGenerator<'a> {
    /// Creates a generator for a domain and the problem's distance matrix.
    pub fn new(domain: &'a Domain, distances: &'a DistanceMatrix) -> Self {
        Self { domain, distances }
    }

    /// Legal, non-redundant actions from `state`, reached along `trail`.
    ///
    /// The order is deterministic: pick-ups, drops, then refuels and drives
    /// per vehicle, each in id order.
    pub fn generate(&self, state: &WorldState, trail: &Trail) -> Vec<Action> {
        if has_cycle(trail) {
            return Vec::new();
        }
        if let Some(drop) = self.drop_at_target(state) {
            return vec![drop];
        }

        let last = trail.last();
        let after_drive = last.filter(|a| a.is_drive()).map(Action::vehicle);
        let loaders: Vec<VehicleId> = match after_drive {
            Some(v) => vec![v],
            None => state.vehicles().map(|v| v.id()).collect(),
        };

        let mut actions = Vec::new();
        for &vehicle in &loaders {
            self.pick_ups(state, trail, vehicle, &mut actions);
        }
        if !matches!(last.map(Action::kind), Some(ActionKind::PickUp { .. })) {
            for &vehicle in &loaders {
                self.drops(state, trail, vehicle, &mut actions);
            }
        }

        let drivers: Vec<VehicleId> = match last {
            Some(a)
                if !matches!(a.kind(), ActionKind::Drop { .. })
                    && self.keeps_driving(state, a.vehicle()) =>
            {
                vec![a.vehicle()]
            }
            _ => state.vehicles().map(|v| v.id()).collect(),
        };
        for &vehicle in &drivers {
            self.refuels(state, trail, vehicle, &mut actions);
            self.drives(state, trail, vehicle, &mut actions);
        }

        actions.retain(|a| a.preconditions_hold(state));
        actions
    }

    /// Whether the last acting vehicle still holds the exclusive right to
    /// drive. An empty vehicle gives it up at its own target, or once no
    /// waiting package is reachable from where it stands.
    fn keeps_driving(&self, state: &WorldState, vehicle: VehicleId) -> bool {
        let v = state.vehicle(vehicle);
        if !v.cargo().is_empty() {
            return true;
        }
        let Some(at) = v.location() else {
            return true;
        };
        if v.target() == Some(at) {
            return false;
        }
        state
            .unfinished_packages()
            .filter_map(|p| p.location())
            .any(|l| self.distances.is_reachable(at, l))
    }

    fn drop_at_target(&self, state: &WorldState) -> Option<Action> {
        state
            .unfinished_packages()
            .filter(|p| p.location().is_none())
            .find_map(|p| {
                let carrier = state.carrier(p.id())?;
                (carrier.location() == Some(p.target()))
                    .then(|| self.domain.drop(state, carrier.id(), p.id()))
            })
    }

    fn pick_ups(&self, state: &WorldState, trail: &Trail, vehicle: VehicleId, out: &mut Vec<Action>) {
        let v = state.vehicle(vehicle);
        let Some(at) = v.location() else {
            return;
        };
        let check_capacity = self.domain.features().capacity;
        for package in state.unfinished_packages() {
            if package.location() != Some(at) {
                continue;
            }
            if check_capacity && package.size() > v.current_capacity() {
                continue;
            }
            if dropped_since_last_drive(trail, vehicle, package.id())
                || needless_reload(state, trail, vehicle, package.id())
            {
                continue;
            }
            out.push(self.domain.pick_up(state, vehicle, package.id()));
        }
    }

    fn drops(&self, state: &WorldState, trail: &Trail, vehicle: VehicleId, out: &mut Vec<Action>) {
        let v = state.vehicle(vehicle);
        let Some(at) = v.location() else {
            return;
        };
        for &package in v.cargo() {
            if picked_up_at(trail, package, at) {
                continue;
            }
            out.push(self.domain.drop(state, vehicle, package));
        }
    }

    fn refuels(&self, state: &WorldState, trail: &Trail, vehicle: VehicleId, out: &mut Vec<Action>) {
        if !self.domain.features().fuel {
            return;
        }
        let v = state.vehicle(vehicle);
        let Some(at) = v.location() else {
            return;
        };
        if !state.network().location(at).has_petrol_station() || v.current_fuel() >= v.max_fuel() {
            return;
        }
        let just_refueled = trail
            .iter_rev()
            .find(|a| a.vehicle() == vehicle)
            .is_some_and(|a| matches!(a.kind(), ActionKind::Refuel));
        if just_refueled {
            return;
        }
        if let Ok(refuel) = self.domain.refuel(state, vehicle) {
            out.push(refuel);
        }
    }

    fn drives(&self, state: &WorldState, trail: &Trail, vehicle: VehicleId, out: &mut Vec<Action>) {
        let Some(at) = state.vehicle(vehicle).location() else {
            return;
        };
        for road in state.network().outgoing(at) {
            if self.shorter_path_exists(trail, vehicle, at, road) {
                continue;
            }
            out.push(self.domain.drive(state, vehicle, road.id()));
        }
    }

    /// Checks the vehicle's trailing run of drives extended by `road`.
    ///
    /// Without fuel the run must stay a shortest path from where it started.
    /// With fuel a longer but cheaper path may be needed, so only runs that
    /// are already longer than the direct distance to the road's end are cut.
    fn shorter_path_exists(
        &self,
        trail: &Trail,
        vehicle: VehicleId,
        at: LocationId,
        road: &Road,
    ) -> bool {
        let mut run = Cost::ZERO;
        let mut start = None;
        for action in trail.iter_rev().filter(|a| a.vehicle() == vehicle) {
            if !action.is_drive() {
                break;
            }
            run += action.duration();
            start = Some(action.location());
        }

        if self.domain.features().fuel {
            start
                .and_then(|s| self.distances.get(s, road.to()))
                .is_some_and(|d| d < run)
        } else {
            self.distances
                .get(start.unwrap_or(at), road.to())
                .is_some_and(|d| d < run + road.length())
        }
    }
}

/// A trailing run of one vehicle's drives that visits a location twice.
fn has_cycle(trail: &Trail) -> bool {
    let Some(last) = trail.last().filter(|a| a.is_drive()) else {
        return false;
    };
    let vehicle = last.vehicle();
    let mut visited = HashSet::new();
    visited.insert(last.destination());
    trail
        .iter_rev()
        .take_while(|a| a.vehicle() == vehicle && a.is_drive())
        .any(|a| !visited.insert(Some(a.location())))
}

fn dropped_since_last_drive(trail: &Trail, vehicle: VehicleId, package: PackageId) -> bool {
    trail
        .iter_rev()
        .filter(|a| a.vehicle() == vehicle)
        .take_while(|a| !a.is_drive())
        .any(|a| matches!(*a.kind(), ActionKind::Drop { package: p } if p == package))
}

fn picked_up_at(trail: &Trail, package: PackageId, at: LocationId) -> bool {
    trail.iter_rev().any(|a| {
        a.location() == at && matches!(*a.kind(), ActionKind::PickUp { package: p } if p == package)
    })
}

/// The vehicle dropped `package` earlier and could have kept it: its free
/// capacity never fell below the package size since, and no other vehicle
/// touched the package.
fn needless_reload(state: &WorldState, trail: &Trail, vehicle: VehicleId, package: PackageId) -> bool {
    let size = state.package(package).size();
    let mut free = state.vehicle(vehicle).current_capacity();
    let mut constrained = false;
    for action in trail.iter_rev() {
        if action.vehicle() != vehicle {
            if action.package() == Some(package) {
                return false;
            }
            continue;
        }
        match *action.kind() {
            ActionKind::Drop { package: p } if p == package => return !constrained,
            ActionKind::Drop { package: p } => free -= state.package(p).size(),
            ActionKind::PickUp { package: p } => free += state.package(p).size(),
            _ => {}
        }
        if free < size {
            constrained = true;
        }
    }
    false
}
