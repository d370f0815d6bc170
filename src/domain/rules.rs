//! Domain rule set: features, predicate templates and action factories.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Action, ActionKind, Condition, Predicate, TemporalQuantifier};
use crate::error::{ModelError, PlanningError};
use crate::models::{Cost, LocationId, PackageId, RoadId, VehicleId, WorldState};

/// Optional parts of the transport domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainFeatures {
    /// Pick-ups require spare capacity.
    pub capacity: bool,
    /// Drives burn fuel and vehicles can refuel.
    pub fuel: bool,
    /// Actions cost their duration instead of one.
    pub action_cost: bool,
    /// Predicates are tagged for temporal planning and loading is serialized.
    pub temporal: bool,
}

/// Predicate lists and duration shared by every action of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionTemplate {
    preconditions: Arc<[Predicate]>,
    effects: Arc<[Predicate]>,
    duration: Cost,
}

impl ActionTemplate {
    fn new(
        features: DomainFeatures,
        preconditions: Vec<Condition>,
        effects: Vec<Condition>,
        duration: Cost,
    ) -> Self {
        let (pre, eff) = if features.temporal {
            (TemporalQuantifier::AtStart, TemporalQuantifier::AtEnd)
        } else {
            (TemporalQuantifier::OverAll, TemporalQuantifier::OverAll)
        };
        Self {
            preconditions: preconditions
                .into_iter()
                .map(|c| Predicate::new(c, pre))
                .collect(),
            effects: effects
                .into_iter()
                .map(|c| Predicate::new(c, eff))
                .collect(),
            duration,
        }
    }

    /// Predicates checked before the action.
    pub fn preconditions(&self) -> &[Predicate] {
        &self.preconditions
    }

    /// Predicates checked after the action.
    pub fn effects(&self) -> &[Predicate] {
        &self.effects
    }

    /// Fixed duration; drives use the road length instead.
    pub fn duration(&self) -> Cost {
        self.duration
    }
}

/// The transport rule set.
///
/// Holds one [`ActionTemplate`] per action kind and creates bound
/// [`Action`]s from them.
///
/// | Kind | Preconditions | Effects |
/// |---|---|---|
/// | drive | who-at-where, is-road, (has-fuel-for-drive) | not(who-at-where), who-at-what |
/// | pick-up | who-at-where, what-at-where, (has-capacity), (ready-loading) | not(what-at-where), what-in-who |
/// | drop | who-at-where, what-in-who, (ready-loading) | not(what-in-who), what-at-where |
/// | refuel | who-at-where, has-petrol-station | |
///
/// Parenthesized predicates depend on the [`DomainFeatures`].
///
/// # Examples
///
/// ```
/// use u_transport::domain::Domain;
///
/// let domain = Domain::builder("transport-fuel")
///     .fuel(true)
///     .action_cost(true)
///     .build();
/// assert!(domain.features().fuel);
/// assert_eq!(domain.refuel_template().duration().value(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    name: Arc<str>,
    features: DomainFeatures,
    drive: ActionTemplate,
    pick_up: ActionTemplate,
    drop: ActionTemplate,
    refuel: ActionTemplate,
}

impl Domain {
    /// Starts building a rule set. Capacity is enabled by default.
    pub fn builder(name: impl Into<String>) -> DomainBuilder {
        DomainBuilder {
            name: name.into(),
            features: DomainFeatures {
                capacity: true,
                ..DomainFeatures::default()
            },
            pick_up_duration: 1,
            drop_duration: 1,
            refuel_duration: 10,
        }
    }

    /// Sequential rule set with capacity, without fuel or action costs.
    pub fn sequential(name: impl Into<String>) -> Domain {
        Self::builder(name).build()
    }

    /// Rule-set name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active features.
    pub fn features(&self) -> DomainFeatures {
        self.features
    }

    /// Template for drives.
    pub fn drive_template(&self) -> &ActionTemplate {
        &self.drive
    }

    /// Template for pick-ups.
    pub fn pick_up_template(&self) -> &ActionTemplate {
        &self.pick_up
    }

    /// Template for drops.
    pub fn drop_template(&self) -> &ActionTemplate {
        &self.drop
    }

    /// Template for refuels.
    pub fn refuel_template(&self) -> &ActionTemplate {
        &self.refuel
    }

    /// Checks that the problem provides what the features need.
    ///
    /// With fuel enabled every vehicle needs a tank and every road a fuel
    /// cost.
    pub fn check_problem(&self, state: &WorldState) -> Result<(), PlanningError> {
        if !self.features.fuel {
            return Ok(());
        }
        if let Some(v) = state.vehicles().find(|v| v.max_fuel().is_none()) {
            return Err(PlanningError::MissingVehicleFuel(v.name().to_string()));
        }
        if let Some(r) = state.network().roads().iter().find(|r| r.fuel_cost().is_none()) {
            return Err(PlanningError::MissingRoadFuel(r.name().to_string()));
        }
        Ok(())
    }

    fn cost_of(&self, duration: Cost) -> Cost {
        if self.features.action_cost {
            duration
        } else {
            Cost::ONE
        }
    }

    fn bind(
        &self,
        template: &ActionTemplate,
        kind: ActionKind,
        state: &WorldState,
        vehicle: VehicleId,
        location: LocationId,
        duration: Cost,
    ) -> Action {
        Action::new(
            kind,
            state,
            vehicle,
            location,
            Arc::clone(&template.preconditions),
            Arc::clone(&template.effects),
            self.cost_of(duration),
            duration,
        )
    }

    fn parked_at(state: &WorldState, vehicle: VehicleId) -> LocationId {
        let v = state.vehicle(vehicle);
        v.location()
            .unwrap_or_else(|| panic!("vehicle `{}` is in transit", v.name()))
    }

    /// Drive of `vehicle` along `road`, starting at the road's source.
    pub fn drive(&self, state: &WorldState, vehicle: VehicleId, road: RoadId) -> Action {
        let r = state.network().road(road);
        let fuel = if self.features.fuel {
            r.fuel_cost()
        } else {
            None
        };
        let kind = ActionKind::Drive {
            road,
            to: r.to(),
            fuel,
        };
        self.bind(&self.drive, kind, state, vehicle, r.from(), r.length())
    }

    /// Drive of `vehicle` along the direct road from `from` to `to`.
    pub fn drive_between(
        &self,
        state: &WorldState,
        vehicle: VehicleId,
        from: LocationId,
        to: LocationId,
    ) -> Result<Action, ModelError> {
        let network = state.network();
        let road = network
            .shortest_edge(from, to)
            .ok_or_else(|| ModelError::MissingRoad {
                from: network.location(from).name().to_string(),
                to: network.location(to).name().to_string(),
            })?;
        Ok(self.drive(state, vehicle, road.id()))
    }

    /// Pick-up of `package` by `vehicle` at the vehicle's location.
    ///
    /// # Panics
    ///
    /// Panics if the vehicle is in transit.
    pub fn pick_up(&self, state: &WorldState, vehicle: VehicleId, package: PackageId) -> Action {
        let at = Self::parked_at(state, vehicle);
        let kind = ActionKind::PickUp { package };
        self.bind(&self.pick_up, kind, state, vehicle, at, self.pick_up.duration)
    }

    /// Drop of `package` by `vehicle` at the vehicle's location.
    ///
    /// # Panics
    ///
    /// Panics if the vehicle is in transit.
    pub fn drop(&self, state: &WorldState, vehicle: VehicleId, package: PackageId) -> Action {
        let at = Self::parked_at(state, vehicle);
        let kind = ActionKind::Drop { package };
        self.bind(&self.drop, kind, state, vehicle, at, self.drop.duration)
    }

    /// Refuel of `vehicle` at its location.
    ///
    /// # Panics
    ///
    /// Panics if the vehicle is in transit.
    pub fn refuel(&self, state: &WorldState, vehicle: VehicleId) -> Result<Action, PlanningError> {
        if !self.features.fuel {
            return Err(PlanningError::FuelDisabled(self.name.to_string()));
        }
        let at = Self::parked_at(state, vehicle);
        Ok(self.bind(
            &self.refuel,
            ActionKind::Refuel,
            state,
            vehicle,
            at,
            self.refuel.duration,
        ))
    }
}

/// Builder for [`Domain`].
#[derive(Debug, Clone)]
pub struct DomainBuilder {
    name: String,
    features: DomainFeatures,
    pick_up_duration: i32,
    drop_duration: i32,
    refuel_duration: i32,
}

impl DomainBuilder {
    /// Enables or disables capacity checks.
    pub fn capacity(mut self, enabled: bool) -> Self {
        self.features.capacity = enabled;
        self
    }

    /// Enables or disables fuel tracking.
    pub fn fuel(mut self, enabled: bool) -> Self {
        self.features.fuel = enabled;
        self
    }

    /// Enables or disables duration-based action costs.
    pub fn action_cost(mut self, enabled: bool) -> Self {
        self.features.action_cost = enabled;
        self
    }

    /// Enables or disables temporal tagging and loading serialization.
    pub fn temporal(mut self, enabled: bool) -> Self {
        self.features.temporal = enabled;
        self
    }

    /// Replaces all features at once.
    pub fn features(mut self, features: DomainFeatures) -> Self {
        self.features = features;
        self
    }

    /// Sets the pick-up duration (default 1).
    pub fn pick_up_duration(mut self, duration: i32) -> Self {
        self.pick_up_duration = duration;
        self
    }

    /// Sets the drop duration (default 1).
    pub fn drop_duration(mut self, duration: i32) -> Self {
        self.drop_duration = duration;
        self
    }

    /// Sets the refuel duration (default 10).
    pub fn refuel_duration(mut self, duration: i32) -> Self {
        self.refuel_duration = duration;
        self
    }

    /// Builds the rule set.
    pub fn build(self) -> Domain {
        use Condition::*;

        let f = self.features;

        let mut drive_pre = vec![WhoAtWhere, IsRoad];
        if f.fuel {
            drive_pre.push(HasFuelForDrive);
        }
        let drive = ActionTemplate::new(
            f,
            drive_pre,
            vec![WhoAtWhere.negated(), WhoAtWhat],
            Cost::ZERO,
        );

        let mut pick_pre = vec![WhoAtWhere, WhatAtWhere];
        if f.capacity {
            pick_pre.push(HasCapacity);
        }
        if f.temporal {
            pick_pre.push(ReadyLoading);
        }
        let pick_up = ActionTemplate::new(
            f,
            pick_pre,
            vec![WhatAtWhere.negated(), WhatInWho],
            Cost::new(self.pick_up_duration),
        );

        let mut drop_pre = vec![WhoAtWhere, WhatInWho];
        if f.temporal {
            drop_pre.push(ReadyLoading);
        }
        let drop = ActionTemplate::new(
            f,
            drop_pre,
            vec![WhatInWho.negated(), WhatAtWhere],
            Cost::new(self.drop_duration),
        );

        let refuel = ActionTemplate::new(
            f,
            vec![WhoAtWhere, HasPetrolStation],
            Vec::new(),
            Cost::new(self.refuel_duration),
        );

        Domain {
            name: self.name.into(),
            features: f,
            drive,
            pick_up,
            drop,
            refuel,
        }
    }
}
