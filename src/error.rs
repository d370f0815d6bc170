//! Error types for problem loading and planner configuration.
//!
//! Only configuration problems are errors. Search outcomes (goal found,
//! frontier exhausted, cancelled) are plain values in
//! [`SearchOutcome`](crate::search::SearchOutcome), and contract violations
//! such as unknown ids panic.

use thiserror::Error;

/// A problem description references something inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A location name is not part of the road network.
    #[error("unknown location `{0}`")]
    UnknownLocation(String),

    /// Two locations share a name.
    #[error("location `{0}` is declared twice")]
    DuplicateLocation(String),

    /// Two roads connect the same ordered pair of locations.
    #[error("road `{from}` -> `{to}` is declared twice")]
    DuplicateRoad {
        /// Source location name.
        from: String,
        /// Destination location name.
        to: String,
    },

    /// A road starts and ends at the same location.
    #[error("road `{0}` starts and ends at the same location")]
    SelfLoop(String),

    /// No direct road exists between two locations.
    #[error("no road from `{from}` to `{to}`")]
    MissingRoad {
        /// Source location name.
        from: String,
        /// Destination location name.
        to: String,
    },

    /// A length, size, capacity or fuel amount is negative.
    #[error("negative {quantity} for `{name}`")]
    NegativeQuantity {
        /// Which quantity was negative.
        quantity: &'static str,
        /// Name of the offending object.
        name: String,
    },

    /// Two vehicles share a name.
    #[error("vehicle `{0}` is declared twice")]
    DuplicateVehicle(String),

    /// Two packages share a name.
    #[error("package `{0}` is declared twice")]
    DuplicatePackage(String),

    /// A vehicle's cargo names an undeclared package.
    #[error("unknown package `{0}`")]
    UnknownPackage(String),

    /// A package is both at a location and carried, or carried twice.
    #[error("package `{0}` is in more than one place")]
    PackageConflict(String),

    /// A package has no location and no vehicle carries it.
    #[error("package `{0}` has no location and is not carried by any vehicle")]
    PackageNowhere(String),

    /// A vehicle's initial cargo exceeds its capacity.
    #[error("cargo of vehicle `{vehicle}` has size {load}, capacity is {capacity}")]
    CapacityExceeded {
        /// Vehicle name.
        vehicle: String,
        /// Total size of the cargo.
        load: i32,
        /// Maximum capacity.
        capacity: i32,
    },

    /// A vehicle's current fuel lies outside `0..=max`.
    #[error("fuel of vehicle `{vehicle}` is {current}, allowed range is 0..={max}")]
    FuelOutOfRange {
        /// Vehicle name.
        vehicle: String,
        /// Current fuel.
        current: i32,
        /// Maximum fuel.
        max: i32,
    },
}

/// A domain and problem cannot be planned together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// The problem itself is malformed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Fuel tracking is enabled but a vehicle has no fuel capacity.
    #[error("fuel tracking is enabled but vehicle `{0}` has no fuel capacity")]
    MissingVehicleFuel(String),

    /// Fuel tracking is enabled but a road has no fuel cost.
    #[error("fuel tracking is enabled but road `{0}` has no fuel cost")]
    MissingRoadFuel(String),

    /// A refuel action was requested from a domain without fuel.
    #[error("domain `{0}` does not track fuel, refuel actions are unavailable")]
    FuelDisabled(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_messages() {
        let err = ModelError::MissingRoad {
            from: "a".into(),
            to: "b".into(),
        };
        assert_eq!(err.to_string(), "no road from `a` to `b`");

        let err = ModelError::CapacityExceeded {
            vehicle: "truck-1".into(),
            load: 5,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "cargo of vehicle `truck-1` has size 5, capacity is 4"
        );
    }

    #[test]
    fn test_planning_error_wraps_model_error() {
        let err: PlanningError = ModelError::UnknownLocation("x".into()).into();
        assert_eq!(err.to_string(), "unknown location `x`");
        assert!(matches!(err, PlanningError::Model(_)));
    }
}
