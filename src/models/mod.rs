//! Domain model types for transport planning problems.
//!
//! Provides the core abstractions: an integer [`Cost`] quantity and typed
//! ids, a directed [`RoadNetwork`] of locations and roads, vehicles with
//! capacity and fuel, packages with delivery targets, the immutable
//! [`WorldState`] that ties everything together, and the sequential
//! [`Plan`] produced by planners.

mod cost;
mod location;
mod network;
mod package;
mod plan;
mod state;
mod vehicle;

pub use cost::{Cost, LocationId, PackageId, RoadId, VehicleId};
pub use location::{Location, Road};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use package::Package;
pub use plan::{Plan, ScheduledAction};
pub use state::{PackageSpec, ProblemBuilder, StateKey, VehicleSpec, WorldState};
pub use vehicle::Vehicle;
