//! Directed road network.

use std::collections::HashMap;

use super::{Cost, Location, LocationId, Road, RoadId};
use crate::error::ModelError;

/// A static directed graph of locations connected by roads.
///
/// At most one road exists per ordered pair of locations. The network is
/// read-only after construction and is shared between world states (and
/// between concurrent planners) behind an `Arc`.
///
/// # Examples
///
/// ```
/// use u_transport::models::{Cost, RoadNetwork};
///
/// let network = RoadNetwork::builder()
///     .location("a", 0.0, 0.0)
///     .location("b", 1.0, 0.0)
///     .two_way_road("a", "b", 10)
///     .build()
///     .expect("valid network");
///
/// let a = network.location_by_name("a").expect("a").id();
/// let b = network.location_by_name("b").expect("b").id();
/// assert_eq!(network.shortest_edge(a, b).map(|r| r.length()), Some(Cost::new(10)));
/// assert_eq!(network.roads().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    locations: Vec<Location>,
    roads: Vec<Road>,
    by_name: HashMap<String, LocationId>,
    edges: HashMap<(LocationId, LocationId), RoadId>,
    outgoing: Vec<Vec<RoadId>>,
}

impl RoadNetwork {
    /// Starts building a network.
    pub fn builder() -> RoadNetworkBuilder {
        RoadNetworkBuilder::default()
    }

    /// All locations, indexed by [`LocationId`].
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// All roads, indexed by [`RoadId`].
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Number of locations.
    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    /// Returns the location with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this network.
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.index()]
    }

    /// Returns the road with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this network.
    pub fn road(&self, id: RoadId) -> &Road {
        &self.roads[id.index()]
    }

    /// Looks up a location by name.
    pub fn location_by_name(&self, name: &str) -> Option<&Location> {
        self.by_name.get(name).map(|&id| self.location(id))
    }

    /// Resolves a location name, reporting unknown names as errors.
    pub fn resolve(&self, name: &str) -> Result<LocationId, ModelError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownLocation(name.to_string()))
    }

    /// The direct road from `from` to `to`, if one exists.
    ///
    /// Multi-hop paths are not edges; see
    /// [`DistanceMatrix`](crate::distance::DistanceMatrix) for those.
    pub fn shortest_edge(&self, from: LocationId, to: LocationId) -> Option<&Road> {
        self.edges.get(&(from, to)).map(|&id| self.road(id))
    }

    /// Roads leaving `from`, in declaration order.
    pub fn outgoing(&self, from: LocationId) -> impl Iterator<Item = &Road> + '_ {
        self.outgoing[from.index()].iter().map(|&id| self.road(id))
    }

    /// Returns `true` if every road carries a fuel cost.
    pub fn is_fuel_network(&self) -> bool {
        self.roads.iter().all(|r| r.fuel_cost().is_some())
    }
}

struct RoadSpec {
    from: String,
    to: String,
    length: i32,
    fuel_cost: Option<i32>,
}

/// Builder for [`RoadNetwork`], resolving names on [`build`](Self::build).
#[derive(Default)]
pub struct RoadNetworkBuilder {
    locations: Vec<(String, f64, f64, bool)>,
    roads: Vec<RoadSpec>,
}

impl RoadNetworkBuilder {
    /// Adds a location.
    pub fn location(mut self, name: impl Into<String>, x: f64, y: f64) -> Self {
        self.locations.push((name.into(), x, y, false));
        self
    }

    /// Adds a location with a petrol station.
    pub fn petrol_station(mut self, name: impl Into<String>, x: f64, y: f64) -> Self {
        self.locations.push((name.into(), x, y, true));
        self
    }

    /// Adds a directed road.
    pub fn road(mut self, from: impl Into<String>, to: impl Into<String>, length: i32) -> Self {
        self.roads.push(RoadSpec {
            from: from.into(),
            to: to.into(),
            length,
            fuel_cost: None,
        });
        self
    }

    /// Adds a directed road that consumes fuel.
    pub fn fuel_road(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        length: i32,
        fuel_cost: i32,
    ) -> Self {
        self.roads.push(RoadSpec {
            from: from.into(),
            to: to.into(),
            length,
            fuel_cost: Some(fuel_cost),
        });
        self
    }

    /// Adds a pair of opposite roads with the same length.
    pub fn two_way_road(self, a: impl Into<String>, b: impl Into<String>, length: i32) -> Self {
        let (a, b) = (a.into(), b.into());
        self.road(a.clone(), b.clone(), length).road(b, a, length)
    }

    /// Adds a pair of opposite fuel roads with the same length and fuel cost.
    pub fn two_way_fuel_road(
        self,
        a: impl Into<String>,
        b: impl Into<String>,
        length: i32,
        fuel_cost: i32,
    ) -> Self {
        let (a, b) = (a.into(), b.into());
        self.fuel_road(a.clone(), b.clone(), length, fuel_cost)
            .fuel_road(b, a, length, fuel_cost)
    }

    /// Validates the declarations and builds the network.
    pub fn build(self) -> Result<RoadNetwork, ModelError> {
        let mut locations = Vec::with_capacity(self.locations.len());
        let mut by_name = HashMap::with_capacity(self.locations.len());
        for (index, (name, x, y, petrol)) in self.locations.into_iter().enumerate() {
            let id = LocationId::new(index);
            if by_name.insert(name.clone(), id).is_some() {
                return Err(ModelError::DuplicateLocation(name));
            }
            locations.push(Location::new(id, name.as_str(), x, y).with_petrol_station(petrol));
        }

        let lookup = |name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| ModelError::UnknownLocation(name.to_string()))
        };

        let mut roads = Vec::with_capacity(self.roads.len());
        let mut edges = HashMap::with_capacity(self.roads.len());
        let mut outgoing = vec![Vec::new(); locations.len()];
        for (index, spec) in self.roads.into_iter().enumerate() {
            let from = lookup(&spec.from)?;
            let to = lookup(&spec.to)?;
            let name = format!("{}->{}", spec.from, spec.to);
            if from == to {
                return Err(ModelError::SelfLoop(name));
            }
            if spec.length < 0 {
                return Err(ModelError::NegativeQuantity {
                    quantity: "length",
                    name,
                });
            }
            let id = RoadId::new(index);
            if edges.insert((from, to), id).is_some() {
                return Err(ModelError::DuplicateRoad {
                    from: spec.from,
                    to: spec.to,
                });
            }
            let mut road = Road::new(id, name.as_str(), from, to, Cost::new(spec.length));
            if let Some(fuel) = spec.fuel_cost {
                if fuel < 0 {
                    return Err(ModelError::NegativeQuantity {
                        quantity: "fuel cost",
                        name,
                    });
                }
                road = road.with_fuel_cost(Cost::new(fuel));
            }
            outgoing[from.index()].push(id);
            roads.push(road);
        }

        Ok(RoadNetwork {
            locations,
            roads,
            by_name,
            edges,
            outgoing,
        })
    }
}
