//! Immutable world state and the problem builder.
//!
//! A [`WorldState`] is a snapshot of every vehicle and package on a shared
//! [`RoadNetwork`]. States are never mutated: [`WorldState::apply`] and the
//! structural updates return a new state that shares all untouched vehicles
//! and packages with the old one.
//!
//! # Apply contract
//!
//! Applying an action runs two phases. The precondition phase performs the
//! bookkeeping that happens when an action starts (fuel is consumed, the
//! vehicle leaves its location, loading is blocked). The effect phase
//! performs what happens when it ends. Search and plan validation both use
//! these two functions, so a plan accepted by one is accepted by the other.

use std::collections::HashSet;
use std::sync::Arc;

use super::{Cost, LocationId, Package, PackageId, RoadNetwork, Vehicle, VehicleId};
use crate::domain::{Action, ActionKind};
use crate::error::ModelError;

/// An immutable snapshot of vehicles and packages on a road network.
///
/// Equality ignores the network handle and compares the vehicle and package
/// configuration only.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_transport::models::{PackageSpec, RoadNetwork, VehicleSpec, WorldState};
///
/// let network = RoadNetwork::builder()
///     .location("a", 0.0, 0.0)
///     .location("b", 1.0, 0.0)
///     .two_way_road("a", "b", 10)
///     .build()
///     .expect("valid network");
///
/// let state = WorldState::builder(Arc::new(network))
///     .vehicle(VehicleSpec::new("truck-1", "a", 2))
///     .package(PackageSpec::at("p1", "a", "b"))
///     .build()
///     .expect("valid problem");
///
/// assert_eq!(state.num_vehicles(), 1);
/// assert!(!state.is_goal());
/// ```
#[derive(Debug, Clone)]
pub struct WorldState {
    network: Arc<RoadNetwork>,
    vehicles: Arc<[Arc<Vehicle>]>,
    packages: Arc<[Arc<Package>]>,
}

impl WorldState {
    /// Starts building a problem on the given network.
    pub fn builder(network: Arc<RoadNetwork>) -> ProblemBuilder {
        ProblemBuilder {
            network,
            vehicles: Vec::new(),
            packages: Vec::new(),
        }
    }

    /// The shared road network.
    pub fn network(&self) -> &Arc<RoadNetwork> {
        &self.network
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// Number of packages.
    pub fn num_packages(&self) -> usize {
        self.packages.len()
    }

    /// All vehicles, in id order.
    pub fn vehicles(&self) -> impl ExactSizeIterator<Item = &Vehicle> + '_ {
        self.vehicles.iter().map(|v| v.as_ref())
    }

    /// All packages, in id order.
    pub fn packages(&self) -> impl ExactSizeIterator<Item = &Package> + '_ {
        self.packages.iter().map(|p| p.as_ref())
    }

    /// Returns the vehicle with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this state.
    pub fn vehicle(&self, id: VehicleId) -> &Vehicle {
        &self.vehicles[id.index()]
    }

    /// Returns the package with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this state.
    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    /// Looks up a vehicle by name.
    pub fn vehicle_by_name(&self, name: &str) -> Option<&Vehicle> {
        self.vehicles().find(|v| v.name() == name)
    }

    /// Looks up a package by name.
    pub fn package_by_name(&self, name: &str) -> Option<&Package> {
        self.packages().find(|p| p.name() == name)
    }

    /// The vehicle carrying `package`, if any.
    pub fn carrier(&self, package: PackageId) -> Option<&Vehicle> {
        self.vehicles().find(|v| v.carries(package))
    }

    /// Where the package physically is: its own location, or its carrier's.
    ///
    /// `None` while the package is in a vehicle that is driving, or during
    /// the gap between the two phases of a pick-up or drop.
    pub fn package_position(&self, package: PackageId) -> Option<LocationId> {
        let p = self.package(package);
        p.location()
            .or_else(|| self.carrier(package).and_then(|v| v.location()))
    }

    /// Returns a new state with `vehicle` replacing the vehicle of the same id.
    pub fn with_vehicle(&self, vehicle: Vehicle) -> WorldState {
        let index = vehicle.id().index();
        let mut vehicles: Vec<Arc<Vehicle>> = self.vehicles.to_vec();
        vehicles[index] = Arc::new(vehicle);
        WorldState {
            network: Arc::clone(&self.network),
            vehicles: vehicles.into(),
            packages: Arc::clone(&self.packages),
        }
    }

    /// Returns a new state with `package` replacing the package of the same id.
    pub fn with_package(&self, package: Package) -> WorldState {
        let index = package.id().index();
        let mut packages: Vec<Arc<Package>> = self.packages.to_vec();
        packages[index] = Arc::new(package);
        WorldState {
            network: Arc::clone(&self.network),
            vehicles: Arc::clone(&self.vehicles),
            packages: packages.into(),
        }
    }

    fn updated_vehicle(&self, id: VehicleId, f: impl FnOnce(Vehicle) -> Vehicle) -> WorldState {
        self.with_vehicle(f(self.vehicle(id).clone()))
    }

    fn updated_package(&self, id: PackageId, f: impl FnOnce(Package) -> Package) -> WorldState {
        self.with_package(f(self.package(id).clone()))
    }

    /// Runs the start-of-action bookkeeping.
    ///
    /// Fuel is subtracted without a sufficiency check; domains that track
    /// fuel guard drives with a precondition instead.
    ///
    /// # Panics
    ///
    /// Panics if a drop names a package that is not in the vehicle's cargo.
    pub fn apply_preconditions(&self, action: &Action) -> WorldState {
        let vehicle = action.vehicle();
        match *action.kind() {
            ActionKind::Drive { fuel, .. } => self.updated_vehicle(vehicle, |v| {
                let v = v.with_location(None);
                match (fuel, v.current_fuel()) {
                    (Some(burn), Some(current)) => v.with_current_fuel(current - burn),
                    _ => v,
                }
            }),
            ActionKind::PickUp { package } => self
                .updated_vehicle(vehicle, |v| v.with_ready_loading(false))
                .updated_package(package, |p| p.with_location(None)),
            ActionKind::Drop { package } => {
                let size = self.package(package).size();
                self.updated_vehicle(vehicle, |v| {
                    v.with_unloaded(package, size).with_ready_loading(false)
                })
                .updated_package(package, |p| p.with_location(None))
            }
            ActionKind::Refuel => self.clone(),
        }
    }

    /// Runs the end-of-action changes.
    ///
    /// # Panics
    ///
    /// Panics if a pick-up names a package that is already in the cargo, or
    /// a refuel targets a vehicle without fuel tracking.
    pub fn apply_effects(&self, action: &Action) -> WorldState {
        let vehicle = action.vehicle();
        match *action.kind() {
            ActionKind::Drive { to, .. } => {
                self.updated_vehicle(vehicle, |v| v.with_location(Some(to)))
            }
            ActionKind::PickUp { package } => {
                let size = self.package(package).size();
                self.updated_vehicle(vehicle, |v| {
                    v.with_ready_loading(true).with_loaded(package, size)
                })
            }
            ActionKind::Drop { package } => {
                let at = action.location();
                self.updated_vehicle(vehicle, |v| v.with_ready_loading(true))
                    .updated_package(package, |p| p.with_location(Some(at)))
            }
            ActionKind::Refuel => self.updated_vehicle(vehicle, |v| {
                let max = v
                    .max_fuel()
                    .unwrap_or_else(|| panic!("vehicle `{}` does not track fuel", v.name()));
                v.with_current_fuel(max)
            }),
        }
    }

    /// Applies both phases of `action` without checking any predicate.
    pub fn apply(&self, action: &Action) -> WorldState {
        self.apply_preconditions(action).apply_effects(action)
    }

    /// Applies `action` if its preconditions hold here and its effects hold
    /// afterwards.
    pub fn try_apply(&self, action: &Action) -> Option<WorldState> {
        if !action.preconditions_hold(self) {
            return None;
        }
        let next = self.apply(action);
        action.effects_hold(&next).then_some(next)
    }

    /// Returns `true` if every package is at its target and every vehicle
    /// with a target is at it.
    pub fn is_goal(&self) -> bool {
        self.packages().all(Package::is_delivered) && self.vehicles().all(Vehicle::is_at_target)
    }

    /// Packages not yet at their target.
    pub fn unfinished_packages(&self) -> impl Iterator<Item = &Package> + '_ {
        self.packages().filter(|p| !p.is_delivered())
    }

    /// Projects the state onto its search identity.
    pub fn key(&self) -> StateKey {
        StateKey {
            vehicles: self
                .vehicles()
                .map(|v| {
                    let mut cargo: Vec<PackageId> = v.cargo().to_vec();
                    cargo.sort_unstable();
                    VehicleKey {
                        location: v.location(),
                        fuel: v.current_fuel(),
                        cargo: cargo.into(),
                    }
                })
                .collect(),
            packages: self.packages().map(Package::location).collect(),
        }
    }
}

impl PartialEq for WorldState {
    fn eq(&self, other: &Self) -> bool {
        self.vehicles == other.vehicles && self.packages == other.packages
    }
}

impl Eq for WorldState {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct VehicleKey {
    location: Option<LocationId>,
    fuel: Option<Cost>,
    cargo: Box<[PackageId]>,
}

/// Hashable identity of a [`WorldState`] used as a search-map key.
///
/// Two states reached along different action sequences share a key when
/// their vehicles (location, fuel, cargo set) and package locations match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    vehicles: Box<[VehicleKey]>,
    packages: Box<[Option<LocationId>]>,
}

/// Declaration of a vehicle by location and package names.
#[derive(Debug, Clone)]
pub struct VehicleSpec {
    name: String,
    location: String,
    capacity: i32,
    target: Option<String>,
    fuel: Option<(i32, i32)>,
    cargo: Vec<String>,
}

impl VehicleSpec {
    /// A vehicle at `location` with the given maximum capacity.
    pub fn new(name: impl Into<String>, location: impl Into<String>, capacity: i32) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            capacity,
            target: None,
            fuel: None,
            cargo: Vec::new(),
        }
    }

    /// Requires the vehicle to end at `target`.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Tracks fuel with the given current and maximum amount.
    pub fn with_fuel(mut self, current: i32, max: i32) -> Self {
        self.fuel = Some((current, max));
        self
    }

    /// Puts a package in the initial cargo.
    pub fn with_cargo(mut self, package: impl Into<String>) -> Self {
        self.cargo.push(package.into());
        self
    }
}

/// Declaration of a package by location names.
#[derive(Debug, Clone)]
pub struct PackageSpec {
    name: String,
    location: Option<String>,
    target: String,
    size: i32,
}

impl PackageSpec {
    /// A package of size 1 lying at `location`.
    pub fn at(
        name: impl Into<String>,
        location: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location: Some(location.into()),
            target: target.into(),
            size: 1,
        }
    }

    /// A package of size 1 that starts in some vehicle's cargo.
    pub fn carried(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
            target: target.into(),
            size: 1,
        }
    }

    /// Sets the package size.
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = size;
        self
    }
}

/// Builder for an initial [`WorldState`].
pub struct ProblemBuilder {
    network: Arc<RoadNetwork>,
    vehicles: Vec<VehicleSpec>,
    packages: Vec<PackageSpec>,
}

impl ProblemBuilder {
    /// Adds a vehicle.
    pub fn vehicle(mut self, spec: VehicleSpec) -> Self {
        self.vehicles.push(spec);
        self
    }

    /// Adds a package.
    pub fn package(mut self, spec: PackageSpec) -> Self {
        self.packages.push(spec);
        self
    }

    /// Resolves names and checks the state invariants.
    ///
    /// Every package must be at a location or in exactly one vehicle, cargo
    /// must fit the vehicle's capacity, and fuel must lie within `0..=max`.
    pub fn build(self) -> Result<WorldState, ModelError> {
        let network = self.network;

        let mut packages = Vec::with_capacity(self.packages.len());
        let mut package_names = HashSet::new();
        for (index, spec) in self.packages.iter().enumerate() {
            if !package_names.insert(spec.name.as_str()) {
                return Err(ModelError::DuplicatePackage(spec.name.clone()));
            }
            if spec.size < 0 {
                return Err(ModelError::NegativeQuantity {
                    quantity: "size",
                    name: spec.name.clone(),
                });
            }
            let location = spec
                .location
                .as_deref()
                .map(|l| network.resolve(l))
                .transpose()?;
            let target = network.resolve(&spec.target)?;
            packages.push(
                Package::new(PackageId::new(index), spec.name.as_str(), location, target)
                    .with_size(Cost::new(spec.size)),
            );
        }

        let mut carried = vec![false; packages.len()];
        let mut vehicles = Vec::with_capacity(self.vehicles.len());
        let mut vehicle_names = HashSet::new();
        for (index, spec) in self.vehicles.iter().enumerate() {
            if !vehicle_names.insert(spec.name.as_str()) {
                return Err(ModelError::DuplicateVehicle(spec.name.clone()));
            }
            if spec.capacity < 0 {
                return Err(ModelError::NegativeQuantity {
                    quantity: "capacity",
                    name: spec.name.clone(),
                });
            }
            let location = network.resolve(&spec.location)?;
            let target = spec
                .target
                .as_deref()
                .map(|t| network.resolve(t))
                .transpose()?;
            let mut vehicle = Vehicle::new(
                VehicleId::new(index),
                spec.name.as_str(),
                location,
                Cost::new(spec.capacity),
            )
            .with_target(target);

            if let Some((current, max)) = spec.fuel {
                if current < 0 || current > max {
                    return Err(ModelError::FuelOutOfRange {
                        vehicle: spec.name.clone(),
                        current,
                        max,
                    });
                }
                vehicle = vehicle.with_fuel(Cost::new(current), Cost::new(max));
            }

            for name in &spec.cargo {
                let package = packages
                    .iter()
                    .find(|p| p.name() == name.as_str())
                    .ok_or_else(|| ModelError::UnknownPackage(name.clone()))?;
                let id = package.id();
                if carried[id.index()] || package.location().is_some() {
                    return Err(ModelError::PackageConflict(name.clone()));
                }
                carried[id.index()] = true;
                vehicle = vehicle.with_loaded(id, package.size());
            }
            if vehicle.current_capacity().is_negative() {
                return Err(ModelError::CapacityExceeded {
                    vehicle: spec.name.clone(),
                    load: (vehicle.max_capacity() - vehicle.current_capacity()).value(),
                    capacity: spec.capacity,
                });
            }
            vehicles.push(Arc::new(vehicle));
        }

        if let Some(lost) = packages
            .iter()
            .find(|p| p.location().is_none() && !carried[p.id().index()])
        {
            return Err(ModelError::PackageNowhere(lost.name().to_string()));
        }

        Ok(WorldState {
            network,
            vehicles: vehicles.into(),
            packages: packages.into_iter().map(Arc::new).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::fixtures;

    #[test]
    fn test_builder_resolves_names() {
        let state = fixtures::two_truck_state();
        assert_eq!(state.num_vehicles(), 2);
        assert_eq!(state.num_packages(), 2);
        let truck = state.vehicle_by_name("truck-2").expect("truck-2");
        assert_eq!(
            state.network().location(truck.location().expect("parked")).name(),
            "L4"
        );
        assert!(state.package_by_name("p3").is_none());
    }

    #[test]
    fn test_builder_rejects_inconsistent_cargo() {
        let network = Arc::new(fixtures::five_location_network());

        let err = WorldState::builder(Arc::clone(&network))
            .vehicle(VehicleSpec::new("t", "L1", 4).with_cargo("p"))
            .package(PackageSpec::at("p", "L1", "L2"))
            .build()
            .unwrap_err();
        assert_eq!(err, ModelError::PackageConflict("p".into()));

        let err = WorldState::builder(Arc::clone(&network))
            .vehicle(VehicleSpec::new("t", "L1", 4))
            .package(PackageSpec::carried("p", "L2"))
            .build()
            .unwrap_err();
        assert_eq!(err, ModelError::PackageNowhere("p".into()));

        let err = WorldState::builder(Arc::clone(&network))
            .vehicle(VehicleSpec::new("t", "L1", 1).with_cargo("p"))
            .package(PackageSpec::carried("p", "L2").with_size(3))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::CapacityExceeded { load: 3, .. }));

        let err = WorldState::builder(network)
            .vehicle(VehicleSpec::new("t", "L1", 1).with_cargo("ghost"))
            .build()
            .unwrap_err();
        assert_eq!(err, ModelError::UnknownPackage("ghost".into()));
    }

    #[test]
    fn test_builder_rejects_bad_fuel() {
        let network = Arc::new(fixtures::five_location_network());
        let err = WorldState::builder(network)
            .vehicle(VehicleSpec::new("t", "L1", 1).with_fuel(12, 10))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::FuelOutOfRange { current: 12, .. }));
    }

    #[test]
    fn test_with_vehicle_shares_untouched_parts() {
        let state = fixtures::two_truck_state();
        let truck = state.vehicle(VehicleId::new(0)).clone().with_location(None);
        let next = state.with_vehicle(truck);

        assert!(state.vehicle(VehicleId::new(0)).location().is_some());
        assert!(next.vehicle(VehicleId::new(0)).location().is_none());
        assert!(Arc::ptr_eq(&state.vehicles[1], &next.vehicles[1]));
        assert!(Arc::ptr_eq(&state.packages, &next.packages));
        assert_ne!(state, next);
    }

    #[test]
    fn test_pick_up_phases() {
        let domain = Domain::sequential("transport");
        let state = fixtures::two_truck_state();
        let truck = state.vehicle_by_name("truck-1").expect("truck").id();
        let p1 = state.package_by_name("p1").expect("p1").id();
        let action = domain.pick_up(&state, truck, p1);

        let mid = state.apply_preconditions(&action);
        assert!(!mid.vehicle(truck).is_ready_loading());
        assert!(mid.package(p1).location().is_none());
        assert!(!mid.vehicle(truck).carries(p1));

        let end = mid.apply_effects(&action);
        assert!(end.vehicle(truck).is_ready_loading());
        assert!(end.vehicle(truck).carries(p1));
        assert_eq!(end.vehicle(truck).current_capacity(), Cost::new(3));
        assert_eq!(end, state.apply(&action));
    }

    #[test]
    fn test_drop_phases() {
        let domain = Domain::sequential("transport");
        let state = fixtures::two_truck_state();
        let net = Arc::clone(state.network());
        let truck = state.vehicle_by_name("truck-1").expect("truck").id();
        let p1 = state.package_by_name("p1").expect("p1").id();
        let l2 = net.resolve("L2").expect("L2");

        let loaded = state.apply(&domain.pick_up(&state, truck, p1));
        let moved = loaded.apply(
            &domain
                .drive_between(&loaded, truck, net.resolve("L1").expect("L1"), l2)
                .expect("road"),
        );
        let action = domain.drop(&moved, truck, p1);

        let mid = moved.apply_preconditions(&action);
        assert!(!mid.vehicle(truck).carries(p1));
        assert!(mid.package(p1).location().is_none());
        assert!(!mid.vehicle(truck).is_ready_loading());

        let end = mid.apply_effects(&action);
        assert_eq!(end.package(p1).location(), Some(l2));
        assert_eq!(end.vehicle(truck).current_capacity(), Cost::new(4));
        assert!(end.package(p1).is_delivered());
    }

    #[test]
    fn test_drive_consumes_fuel_and_transits() {
        let domain = Domain::builder("fuel").fuel(true).build();
        let state = fixtures::fuel_state(30);
        let net = Arc::clone(state.network());
        let truck = VehicleId::new(0);
        let action = domain
            .drive_between(
                &state,
                truck,
                net.resolve("A").expect("A"),
                net.resolve("B").expect("B"),
            )
            .expect("road");

        let mid = state.apply_preconditions(&action);
        assert!(mid.vehicle(truck).location().is_none());
        assert_eq!(mid.vehicle(truck).current_fuel(), Some(Cost::new(20)));

        let end = mid.apply_effects(&action);
        assert_eq!(end.vehicle(truck).location(), net.resolve("B").ok());
    }

    #[test]
    fn test_fuel_may_go_negative_without_check() {
        let domain = Domain::builder("fuel").fuel(true).build();
        let state = fixtures::fuel_state(4);
        let net = Arc::clone(state.network());
        let action = domain
            .drive_between(
                &state,
                VehicleId::new(0),
                net.resolve("A").expect("A"),
                net.resolve("B").expect("B"),
            )
            .expect("road");

        let end = state.apply(&action);
        assert_eq!(end.vehicle(VehicleId::new(0)).current_fuel(), Some(Cost::new(-6)));
        assert!(state.try_apply(&action).is_none());
    }

    #[test]
    fn test_refuel_fills_tank() {
        let domain = Domain::builder("fuel").fuel(true).build();
        let state = fixtures::fuel_state(4);
        let action = domain.refuel(&state, VehicleId::new(0)).expect("fuel domain");
        let end = state.try_apply(&action).expect("petrol station at A");
        assert_eq!(end.vehicle(VehicleId::new(0)).current_fuel(), Some(Cost::new(40)));
    }

    #[test]
    fn test_key_ignores_cargo_order_and_ready_flag() {
        let state = fixtures::two_truck_state();
        let truck = state.vehicle(VehicleId::new(0)).clone();
        let a = state.with_vehicle(
            truck
                .clone()
                .with_loaded(PackageId::new(0), Cost::ONE)
                .with_loaded(PackageId::new(1), Cost::ONE),
        );
        let b = state.with_vehicle(
            truck
                .with_loaded(PackageId::new(1), Cost::ONE)
                .with_loaded(PackageId::new(0), Cost::ONE)
                .with_ready_loading(false),
        );
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), state.key());
    }

    #[test]
    fn test_goal_requires_vehicle_targets() {
        let network = Arc::new(fixtures::five_location_network());
        let state = WorldState::builder(network)
            .vehicle(VehicleSpec::new("t", "L1", 1).with_target("L2"))
            .package(PackageSpec::at("p", "L3", "L3"))
            .build()
            .expect("valid");
        assert_eq!(state.unfinished_packages().count(), 0);
        assert!(!state.is_goal());
    }

    #[test]
    fn test_package_position_follows_carrier() {
        let domain = Domain::sequential("transport");
        let state = fixtures::two_truck_state();
        let p1 = PackageId::new(0);
        let truck = VehicleId::new(0);
        let loaded = state.apply(&domain.pick_up(&state, truck, p1));
        assert_eq!(loaded.package(p1).location(), None);
        assert_eq!(
            loaded.package_position(p1),
            loaded.vehicle(truck).location()
        );
    }
}
