//! # u-transport
//!
//! Transport logistics planning: vehicles with capacity and fuel move
//! packages across a road network, and forward search finds a sequence of
//! drive, pick-up, drop and refuel actions that delivers every package.
//!
//! ## Modules
//!
//! - [`models`]: Road network, vehicles, packages, immutable world states, plans
//! - [`distance`]: All-pairs shortest road distances and paths
//! - [`domain`]: Rule sets, predicates and action factories
//! - [`evaluation`]: Plan validation by replay
//! - [`search`]: A* and breadth-first planners with cancellation
//! - [`randomized`]: Anytime randomized restart planner
//! - [`error`]: Configuration and planning errors
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use u_transport::domain::Domain;
//! use u_transport::evaluation::PlanValidator;
//! use u_transport::models::{PackageSpec, RoadNetwork, VehicleSpec, WorldState};
//! use u_transport::search::{AstarPlanner, Planner};
//!
//! let network = RoadNetwork::builder()
//!     .location("depot", 0.0, 0.0)
//!     .location("shop", 3.0, 4.0)
//!     .two_way_road("depot", "shop", 5)
//!     .build()
//!     .expect("valid network");
//! let problem = WorldState::builder(Arc::new(network))
//!     .vehicle(VehicleSpec::new("truck-1", "depot", 2))
//!     .package(PackageSpec::at("crate", "depot", "shop"))
//!     .build()
//!     .expect("valid problem");
//!
//! let domain = Domain::sequential("transport");
//! let plan = AstarPlanner::new().plan(&domain, &problem).expect("plan");
//! assert_eq!(plan.total_duration().value(), 7);
//! assert!(PlanValidator::new(&domain).validate(&problem, &plan).reaches_goal());
//! ```

pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod randomized;
pub mod search;

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared problems for unit tests.

    use std::sync::Arc;

    use crate::domain::Domain;
    use crate::models::{
        PackageId, PackageSpec, Plan, RoadNetwork, VehicleId, VehicleSpec, WorldState,
    };

    /// L1..L5 with two-way roads L1-L2 20, L1-L3 12, L3-L2 12, L4-L5 30,
    /// L4-L3 18 and L3-L5 18.
    pub fn five_location_network() -> RoadNetwork {
        RoadNetwork::builder()
            .location("L1", 0.0, 0.0)
            .location("L2", 20.0, 0.0)
            .location("L3", 10.0, 6.0)
            .location("L4", 0.0, 20.0)
            .location("L5", 20.0, 20.0)
            .two_way_road("L1", "L2", 20)
            .two_way_road("L1", "L3", 12)
            .two_way_road("L3", "L2", 12)
            .two_way_road("L4", "L5", 30)
            .two_way_road("L4", "L3", 18)
            .two_way_road("L3", "L5", 18)
            .build()
            .expect("valid network")
    }

    /// truck-1 at L1 and truck-2 at L4, capacity 4 each; p1 goes L1 -> L2,
    /// p2 goes L4 -> L5. The shortest plan takes 54.
    pub fn two_truck_state() -> WorldState {
        WorldState::builder(Arc::new(five_location_network()))
            .vehicle(VehicleSpec::new("truck-1", "L1", 4))
            .vehicle(VehicleSpec::new("truck-2", "L4", 4))
            .package(PackageSpec::at("p1", "L1", "L2"))
            .package(PackageSpec::at("p2", "L4", "L5"))
            .build()
            .expect("valid problem")
    }

    /// Petrol station A and plain B joined by fuel roads of length and fuel
    /// cost 10; truck-1 at A with `fuel` of 40, p1 goes B -> A.
    pub fn fuel_state(fuel: i32) -> WorldState {
        let network = RoadNetwork::builder()
            .petrol_station("A", 0.0, 0.0)
            .location("B", 10.0, 0.0)
            .two_way_fuel_road("A", "B", 10, 10)
            .build()
            .expect("valid network");
        WorldState::builder(Arc::new(network))
            .vehicle(VehicleSpec::new("truck-1", "A", 4).with_fuel(fuel, 40))
            .package(PackageSpec::at("p1", "B", "A"))
            .build()
            .expect("valid problem")
    }

    /// 3x3 grid `Grc` with roads of length 10 between neighbours, three
    /// trucks of capacity 2 and six packages.
    pub fn grid_state() -> WorldState {
        let mut builder = RoadNetwork::builder();
        for r in 0..3 {
            for c in 0..3 {
                builder = builder.location(format!("G{r}{c}"), c as f64, r as f64);
            }
        }
        for r in 0..3 {
            for c in 0..3 {
                if c < 2 {
                    builder = builder.two_way_road(format!("G{r}{c}"), format!("G{r}{}", c + 1), 10);
                }
                if r < 2 {
                    builder = builder.two_way_road(format!("G{r}{c}"), format!("G{}{c}", r + 1), 10);
                }
            }
        }
        let network = builder.build().expect("valid network");
        WorldState::builder(Arc::new(network))
            .vehicle(VehicleSpec::new("truck-1", "G00", 2))
            .vehicle(VehicleSpec::new("truck-2", "G22", 2))
            .vehicle(VehicleSpec::new("truck-3", "G02", 2))
            .package(PackageSpec::at("p1", "G00", "G22"))
            .package(PackageSpec::at("p2", "G20", "G02"))
            .package(PackageSpec::at("p3", "G11", "G00"))
            .package(PackageSpec::at("p4", "G01", "G21"))
            .package(PackageSpec::at("p5", "G12", "G10"))
            .package(PackageSpec::at("p6", "G22", "G00"))
            .build()
            .expect("valid problem")
    }

    /// The 54-long plan for [`two_truck_state`]: truck-1 delivers p1, then
    /// truck-2 delivers p2.
    pub fn optimal_plan(domain: &Domain, state: &WorldState) -> Plan {
        let net = Arc::clone(state.network());
        let id = |name: &str| net.resolve(name).expect("location");
        let mut current = state.clone();
        let mut actions = Vec::new();
        for (truck, package, from, to) in [(0, 0, "L1", "L2"), (1, 1, "L4", "L5")] {
            let (truck, package) = (VehicleId::new(truck), PackageId::new(package));
            let pick = domain.pick_up(&current, truck, package);
            current = current.apply(&pick);
            let drive = domain
                .drive_between(&current, truck, id(from), id(to))
                .expect("road");
            current = current.apply(&drive);
            let drop = domain.drop(&current, truck, package);
            current = current.apply(&drop);
            actions.extend([pick, drive, drop]);
        }
        Plan::new(actions)
    }
}
