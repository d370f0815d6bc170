//! Vehicle type with capacity, fuel and cargo.

use std::sync::Arc;

use super::{Cost, LocationId, PackageId, VehicleId};

/// A vehicle that carries packages along roads.
///
/// `current_capacity` is the spare room left after loading the cargo, so it
/// moves between zero and `max_capacity` as packages are picked up and
/// dropped. Fuel is optional: vehicles in domains without fuel tracking leave
/// both fuel values unset.
///
/// Vehicles are immutable values; every update consumes `self` and returns
/// the changed copy.
///
/// # Examples
///
/// ```
/// use u_transport::models::{Cost, LocationId, PackageId, Vehicle, VehicleId};
///
/// let v = Vehicle::new(VehicleId::new(0), "truck-1", LocationId::new(3), Cost::new(4))
///     .with_fuel(Cost::new(50), Cost::new(100));
/// assert_eq!(v.location(), Some(LocationId::new(3)));
/// assert_eq!(v.current_fuel(), Some(Cost::new(50)));
///
/// let v = v.with_loaded(PackageId::new(0), Cost::new(3));
/// assert_eq!(v.current_capacity(), Cost::new(1));
/// assert!(v.carries(PackageId::new(0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    id: VehicleId,
    name: Arc<str>,
    location: Option<LocationId>,
    target: Option<LocationId>,
    current_capacity: Cost,
    max_capacity: Cost,
    current_fuel: Option<Cost>,
    max_fuel: Option<Cost>,
    cargo: Vec<PackageId>,
    ready_loading: bool,
}

impl Vehicle {
    /// Creates an empty vehicle at `location` with the given capacity.
    ///
    /// Default: no target, no fuel tracking, ready for loading.
    pub fn new(
        id: VehicleId,
        name: impl Into<Arc<str>>,
        location: LocationId,
        max_capacity: Cost,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location: Some(location),
            target: None,
            current_capacity: max_capacity,
            max_capacity,
            current_fuel: None,
            max_fuel: None,
            cargo: Vec::new(),
            ready_loading: true,
        }
    }

    /// Sets the location the vehicle must end at.
    pub fn with_target(mut self, target: Option<LocationId>) -> Self {
        self.target = target;
        self
    }

    /// Enables fuel tracking with the given current and maximum fuel.
    pub fn with_fuel(mut self, current: Cost, max: Cost) -> Self {
        self.current_fuel = Some(current);
        self.max_fuel = Some(max);
        self
    }

    /// Moves the vehicle to `location`, or into transit with `None`.
    pub fn with_location(mut self, location: Option<LocationId>) -> Self {
        self.location = location;
        self
    }

    /// Replaces the current fuel level.
    ///
    /// # Panics
    ///
    /// Panics if the vehicle does not track fuel.
    pub fn with_current_fuel(mut self, fuel: Cost) -> Self {
        assert!(
            self.current_fuel.is_some(),
            "vehicle `{}` does not track fuel",
            self.name
        );
        self.current_fuel = Some(fuel);
        self
    }

    /// Sets the ready-for-loading flag.
    pub fn with_ready_loading(mut self, ready: bool) -> Self {
        self.ready_loading = ready;
        self
    }

    /// Adds a package of the given size to the cargo.
    ///
    /// # Panics
    ///
    /// Panics if the package is already on board.
    pub fn with_loaded(mut self, package: PackageId, size: Cost) -> Self {
        assert!(
            !self.cargo.contains(&package),
            "package {package} is already in vehicle `{}`",
            self.name
        );
        self.cargo.push(package);
        self.current_capacity -= size;
        self
    }

    /// Removes a package of the given size from the cargo.
    ///
    /// # Panics
    ///
    /// Panics if the package is not on board.
    pub fn with_unloaded(mut self, package: PackageId, size: Cost) -> Self {
        let index = self
            .cargo
            .iter()
            .position(|&p| p == package)
            .unwrap_or_else(|| panic!("package {package} is not in vehicle `{}`", self.name));
        self.cargo.remove(index);
        self.current_capacity += size;
        self
    }

    /// Vehicle id.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Vehicle name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name.
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Current location, or `None` while driving.
    pub fn location(&self) -> Option<LocationId> {
        self.location
    }

    /// Location the vehicle must end at, if any.
    pub fn target(&self) -> Option<LocationId> {
        self.target
    }

    /// Spare capacity left after loading the cargo.
    pub fn current_capacity(&self) -> Cost {
        self.current_capacity
    }

    /// Capacity of the empty vehicle.
    pub fn max_capacity(&self) -> Cost {
        self.max_capacity
    }

    /// Current fuel, if fuel is tracked.
    pub fn current_fuel(&self) -> Option<Cost> {
        self.current_fuel
    }

    /// Tank size, if fuel is tracked.
    pub fn max_fuel(&self) -> Option<Cost> {
        self.max_fuel
    }

    /// Packages on board, in loading order.
    pub fn cargo(&self) -> &[PackageId] {
        &self.cargo
    }

    /// Returns `true` if `package` is on board.
    pub fn carries(&self, package: PackageId) -> bool {
        self.cargo.contains(&package)
    }

    /// Returns `true` if no pick-up or drop is in progress.
    pub fn is_ready_loading(&self) -> bool {
        self.ready_loading
    }

    /// Returns `true` if the vehicle is at its target or has none.
    pub fn is_at_target(&self) -> bool {
        self.target.is_none() || self.target == self.location
    }
}
