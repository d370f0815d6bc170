//! Location and road types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Cost, LocationId, RoadId};

/// A location in the road network.
///
/// Locations are identified by name and carry coordinates (used only for
/// presentation) and an optional petrol station.
///
/// # Examples
///
/// ```
/// use u_transport::models::{Location, LocationId};
///
/// let loc = Location::new(LocationId::new(0), "city-loc-1", 3.0, 4.0);
/// assert_eq!(loc.name(), "city-loc-1");
/// assert!(!loc.has_petrol_station());
///
/// let depot = loc.with_petrol_station(true);
/// assert!(depot.has_petrol_station());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    name: Arc<str>,
    x: f64,
    y: f64,
    petrol_station: bool,
}

impl Location {
    /// Creates a location without a petrol station.
    pub fn new(id: LocationId, name: impl Into<Arc<str>>, x: f64, y: f64) -> Self {
        Self {
            id,
            name: name.into(),
            x,
            y,
            petrol_station: false,
        }
    }

    /// Sets whether the location has a petrol station.
    pub fn with_petrol_station(mut self, petrol_station: bool) -> Self {
        self.petrol_station = petrol_station;
        self
    }

    /// Location id.
    pub fn id(&self) -> LocationId {
        self.id
    }

    /// Location name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name.
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Returns `true` if vehicles can refuel here.
    pub fn has_petrol_station(&self) -> bool {
        self.petrol_station
    }

    /// Euclidean distance between the coordinates of two locations.
    pub fn euclidean_distance(&self, other: &Location) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A directed road between two locations.
///
/// Plain roads only have a length. Fuel roads additionally consume fuel when
/// driven.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    id: RoadId,
    name: Arc<str>,
    from: LocationId,
    to: LocationId,
    length: Cost,
    fuel_cost: Option<Cost>,
}

impl Road {
    /// Creates a road without a fuel cost.
    pub fn new(
        id: RoadId,
        name: impl Into<Arc<str>>,
        from: LocationId,
        to: LocationId,
        length: Cost,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            from,
            to,
            length,
            fuel_cost: None,
        }
    }

    /// Sets the fuel consumed by driving this road.
    pub fn with_fuel_cost(mut self, fuel_cost: Cost) -> Self {
        self.fuel_cost = Some(fuel_cost);
        self
    }

    /// Road id.
    pub fn id(&self) -> RoadId {
        self.id
    }

    /// Road name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source location.
    pub fn from(&self) -> LocationId {
        self.from
    }

    /// Destination location.
    pub fn to(&self) -> LocationId {
        self.to
    }

    /// Road length (also the duration of driving it).
    pub fn length(&self) -> Cost {
        self.length
    }

    /// Fuel consumed by driving this road, if it is a fuel road.
    pub fn fuel_cost(&self) -> Option<Cost> {
        self.fuel_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_new() {
        let loc = Location::new(LocationId::new(2), "a", 1.0, 2.0);
        assert_eq!(loc.id(), LocationId::new(2));
        assert_eq!(loc.name(), "a");
        assert_eq!(loc.x(), 1.0);
        assert_eq!(loc.y(), 2.0);
        assert!(!loc.has_petrol_station());
    }

    #[test]
    fn test_location_distance() {
        let a = Location::new(LocationId::new(0), "a", 0.0, 0.0);
        let b = Location::new(LocationId::new(1), "b", 3.0, 4.0);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-10);
        assert!((a.euclidean_distance(&b) - b.euclidean_distance(&a)).abs() < 1e-10);
    }

    #[test]
    fn test_road_fuel_cost() {
        let road = Road::new(
            RoadId::new(0),
            "a->b",
            LocationId::new(0),
            LocationId::new(1),
            Cost::new(12),
        );
        assert_eq!(road.length(), Cost::new(12));
        assert!(road.fuel_cost().is_none());

        let fuel_road = road.with_fuel_cost(Cost::new(3));
        assert_eq!(fuel_road.fuel_cost(), Some(Cost::new(3)));
        assert_eq!(fuel_road.from(), LocationId::new(0));
        assert_eq!(fuel_road.to(), LocationId::new(1));
    }
}
