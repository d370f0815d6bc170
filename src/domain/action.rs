//! Concrete actions bound to a vehicle, a location and an object.

use std::fmt;
use std::sync::Arc;

use super::Predicate;
use crate::models::{Cost, LocationId, PackageId, RoadId, VehicleId, WorldState};

/// The four action kinds and the data specific to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Drive along `road` to `to`, burning `fuel` when the domain tracks it.
    Drive {
        /// Road driven.
        road: RoadId,
        /// Destination.
        to: LocationId,
        /// Fuel consumed, `None` in domains without fuel.
        fuel: Option<Cost>,
    },
    /// Load a package lying at the vehicle's location.
    PickUp {
        /// Package loaded.
        package: PackageId,
    },
    /// Unload a package at the vehicle's location.
    Drop {
        /// Package unloaded.
        package: PackageId,
    },
    /// Fill the vehicle's tank.
    Refuel,
}

impl ActionKind {
    /// Rule-set name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Drive { .. } => "drive",
            ActionKind::PickUp { .. } => "pick-up",
            ActionKind::Drop { .. } => "drop",
            ActionKind::Refuel => "refuel",
        }
    }
}

/// An action instance: who does what where, with the rule set's predicates.
///
/// Actions are built by [`Domain`](super::Domain) factories, which bind the
/// kind's predicate templates, cost and duration. Cloning is cheap: names
/// and predicate lists are shared.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_transport::domain::Domain;
/// use u_transport::models::{PackageSpec, RoadNetwork, VehicleSpec, WorldState};
///
/// let network = RoadNetwork::builder()
///     .location("a", 0.0, 0.0)
///     .location("b", 1.0, 0.0)
///     .two_way_road("a", "b", 10)
///     .build()
///     .expect("valid network");
/// let state = WorldState::builder(Arc::new(network))
///     .vehicle(VehicleSpec::new("truck-1", "a", 2))
///     .package(PackageSpec::at("p1", "a", "b"))
///     .build()
///     .expect("valid problem");
///
/// let domain = Domain::sequential("transport");
/// let truck = state.vehicle_by_name("truck-1").expect("truck").id();
/// let p1 = state.package_by_name("p1").expect("package").id();
/// let pick = domain.pick_up(&state, truck, p1);
///
/// assert_eq!(pick.to_string(), "pick-up[truck-1 @ a: p1]");
/// assert!(pick.preconditions_hold(&state));
/// assert!(pick.effects_hold(&state.apply(&pick)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    kind: ActionKind,
    vehicle: VehicleId,
    location: LocationId,
    vehicle_name: Arc<str>,
    location_name: Arc<str>,
    object_name: Option<Arc<str>>,
    preconditions: Arc<[Predicate]>,
    effects: Arc<[Predicate]>,
    cost: Cost,
    duration: Cost,
}

impl Action {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        kind: ActionKind,
        state: &WorldState,
        vehicle: VehicleId,
        location: LocationId,
        preconditions: Arc<[Predicate]>,
        effects: Arc<[Predicate]>,
        cost: Cost,
        duration: Cost,
    ) -> Self {
        let network = state.network();
        let object_name = match kind {
            ActionKind::Drive { to, .. } => Some(Arc::clone(network.location(to).name_arc())),
            ActionKind::PickUp { package } | ActionKind::Drop { package } => {
                Some(Arc::clone(state.package(package).name_arc()))
            }
            ActionKind::Refuel => None,
        };
        Self {
            kind,
            vehicle,
            location,
            vehicle_name: Arc::clone(state.vehicle(vehicle).name_arc()),
            location_name: Arc::clone(network.location(location).name_arc()),
            object_name,
            preconditions,
            effects,
            cost,
            duration,
        }
    }

    /// Kind and kind-specific data.
    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Acting vehicle.
    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    /// Name of the acting vehicle.
    pub fn vehicle_name(&self) -> &str {
        &self.vehicle_name
    }

    /// Location the action starts at.
    pub fn location(&self) -> LocationId {
        self.location
    }

    /// Package handled by a pick-up or drop.
    pub fn package(&self) -> Option<PackageId> {
        match self.kind {
            ActionKind::PickUp { package } | ActionKind::Drop { package } => Some(package),
            _ => None,
        }
    }

    /// Destination of a drive.
    pub fn destination(&self) -> Option<LocationId> {
        match self.kind {
            ActionKind::Drive { to, .. } => Some(to),
            _ => None,
        }
    }

    /// Road of a drive.
    pub fn road(&self) -> Option<RoadId> {
        match self.kind {
            ActionKind::Drive { road, .. } => Some(road),
            _ => None,
        }
    }

    /// Returns `true` for drives.
    pub fn is_drive(&self) -> bool {
        matches!(self.kind, ActionKind::Drive { .. })
    }

    /// Predicates that must hold before the action.
    pub fn preconditions(&self) -> &[Predicate] {
        &self.preconditions
    }

    /// Predicates that must hold after the action.
    pub fn effects(&self) -> &[Predicate] {
        &self.effects
    }

    /// Plan cost of the action.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Time the action takes.
    pub fn duration(&self) -> Cost {
        self.duration
    }

    /// First precondition that fails in `state`.
    pub fn failed_precondition(&self, state: &WorldState) -> Option<&Predicate> {
        self.preconditions.iter().find(|p| !p.holds(state, self))
    }

    /// First effect that fails in `state`.
    pub fn failed_effect(&self, state: &WorldState) -> Option<&Predicate> {
        self.effects.iter().find(|p| !p.holds(state, self))
    }

    /// Returns `true` if every precondition holds in `state`.
    pub fn preconditions_hold(&self, state: &WorldState) -> bool {
        self.failed_precondition(state).is_none()
    }

    /// Returns `true` if every effect holds in `state`.
    pub fn effects_hold(&self, state: &WorldState) -> bool {
        self.failed_effect(state).is_none()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{} @ {}",
            self.kind.name(),
            self.vehicle_name,
            self.location_name
        )?;
        match (&self.kind, &self.object_name) {
            (ActionKind::Drive { .. }, Some(to)) => write!(f, " -> {to}]"),
            (_, Some(object)) => write!(f, ": {object}]"),
            (_, None) => f.write_str("]"),
        }
    }
}
