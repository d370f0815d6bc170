//! Randomized restart planner.
//!
//! # Algorithm
//!
//! Each restart builds one complete plan from the initial state:
//!
//! 1. Vehicles that start loaded deliver their cargo, nearest target first.
//! 2. While packages wait, pick one at random and a random vehicle that can
//!    carry it and reach it. The vehicle follows a shortest path to the
//!    package and on to its target. At every stop it drops cargo due there
//!    and loads waiting packages whose target lies further along the route,
//!    keeping room for the chosen package.
//! 3. Vehicles with a target drive there.
//!
//! Before a drive that needs more fuel than the vehicle has, the vehicle
//! refuels if it stands at a petrol station. A restart is abandoned when an
//! action is not applicable, a location is unreachable, or its duration
//! reaches the best plan found so far.
//!
//! Every action goes through [`WorldState::try_apply`], so returned plans
//! are accepted by the plan validator.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::RandomizedConfig;
use crate::distance::DistanceMatrix;
use crate::domain::{Action, Domain};
use crate::error::PlanningError;
use crate::models::{Cost, LocationId, PackageId, Plan, RoadId, VehicleId, WorldState};
use crate::search::{
    finish, CancellationToken, Planner, PlannerControl, SearchOutcome, SearchStats, SearchStatus,
};

/// Anytime planner built from greedy randomized restarts.
///
/// Search statistics count restarts as expansions and applied actions as
/// generated nodes.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_transport::domain::Domain;
/// use u_transport::models::{PackageSpec, RoadNetwork, VehicleSpec, WorldState};
/// use u_transport::randomized::{RandomizedConfig, RandomizedRestartPlanner};
/// use u_transport::search::Planner;
///
/// let network = RoadNetwork::builder()
///     .location("a", 0.0, 0.0)
///     .location("b", 1.0, 0.0)
///     .two_way_road("a", "b", 10)
///     .build()
///     .expect("valid network");
/// let state = WorldState::builder(Arc::new(network))
///     .vehicle(VehicleSpec::new("truck-1", "b", 2))
///     .package(PackageSpec::at("p1", "a", "b"))
///     .build()
///     .expect("valid problem");
///
/// let planner = RandomizedRestartPlanner::new()
///     .with_config(RandomizedConfig::default().with_max_restarts(10));
/// let plan = planner.plan(&Domain::sequential("transport"), &state).expect("plan");
/// assert_eq!(plan.total_duration().value(), 22);
/// ```
#[derive(Debug, Default)]
pub struct RandomizedRestartPlanner {
    config: RandomizedConfig,
    control: PlannerControl,
}

impl RandomizedRestartPlanner {
    /// Creates a planner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: RandomizedConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &RandomizedConfig {
        &self.config
    }

    /// Runs the restarts with a precomputed distance matrix for `problem`'s
    /// network.
    pub fn search_with_distances(
        &self,
        domain: &Domain,
        problem: &WorldState,
        distances: Arc<DistanceMatrix>,
    ) -> Result<SearchOutcome, PlanningError> {
        let _running = self.control.start();
        domain.check_problem(problem)?;
        Ok(self.run(domain, problem, &distances))
    }

    fn run(&self, domain: &Domain, problem: &WorldState, distances: &DistanceMatrix) -> SearchOutcome {
        let token = self.control.token();
        let started = Instant::now();
        tracing::debug!(
            planner = self.name(),
            domain = domain.name(),
            seed = self.config.seed,
            max_restarts = self.config.max_restarts,
            "search started"
        );

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut stats = SearchStats::default();
        let mut best: Option<Plan> = None;
        let mut cancelled = false;

        for restart in 0..self.config.max_restarts {
            if token.is_cancelled() {
                cancelled = true;
                break;
            }
            stats.expanded += 1;

            let bound = best.as_ref().map(Plan::total_duration);
            let mut run = Restart::new(domain, distances, problem, bound);
            let completed = run.complete(&mut rng).is_some() && run.state.is_goal();
            stats.generated += run.actions.len() as u64;
            if completed {
                tracing::info!(
                    planner = self.name(),
                    restart,
                    duration = run.duration.value(),
                    "new best plan"
                );
                best = Some(Plan::new(run.actions));
            }
        }

        let status = match (cancelled, &best) {
            (true, _) => SearchStatus::Cancelled,
            (false, Some(_)) => SearchStatus::GoalFound,
            (false, None) => SearchStatus::Exhausted,
        };
        finish(self.name(), status, best, stats, started)
    }
}

impl Planner for RandomizedRestartPlanner {
    fn name(&self) -> &str {
        "randomized-restart"
    }

    fn search(&self, domain: &Domain, problem: &WorldState) -> Result<SearchOutcome, PlanningError> {
        let _running = self.control.start();
        domain.check_problem(problem)?;
        let distances = DistanceMatrix::compute(problem.network());
        Ok(self.run(domain, problem, &distances))
    }

    fn cancel(&self) -> bool {
        self.control.cancel()
    }

    fn is_planning(&self) -> bool {
        self.control.is_planning()
    }

    fn cancellation_token(&self) -> CancellationToken {
        self.control.token().clone()
    }
}

/// One restart: a partial plan under construction.
///
/// Methods return `None` when the restart has to be abandoned.
struct Restart<'a> {
    domain: &'a Domain,
    distances: &'a DistanceMatrix,
    state: WorldState,
    actions: Vec<Action>,
    duration: Cost,
    bound: Option<Cost>,
}

impl<'a> Restart<'a> {
    fn new(
        domain: &'a Domain,
        distances: &'a DistanceMatrix,
        initial: &WorldState,
        bound: Option<Cost>,
    ) -> Self {
        Self {
            domain,
            distances,
            state: initial.clone(),
            actions: Vec::new(),
            duration: Cost::ZERO,
            bound,
        }
    }

    fn vehicle_ids(&self) -> Vec<VehicleId> {
        self.state.vehicles().map(|v| v.id()).collect()
    }

    fn complete(&mut self, rng: &mut impl Rng) -> Option<()> {
        for vehicle in self.vehicle_ids() {
            self.deliver_cargo(vehicle)?;
        }

        loop {
            let waiting: Vec<PackageId> = self
                .state
                .unfinished_packages()
                .filter(|p| p.location().is_some())
                .map(|p| p.id())
                .collect();
            if waiting.is_empty() {
                break;
            }
            let package = waiting[rng.random_range(0..waiting.len())];
            let vehicle = self.choose_vehicle(package, rng)?;
            self.deliver(vehicle, package)?;
        }

        for vehicle in self.vehicle_ids() {
            let v = self.state.vehicle(vehicle);
            if let Some(target) = v.target() {
                let path = self.distances.path(v.location()?, target)?;
                self.follow(vehicle, &path, None)?;
            }
        }
        Some(())
    }

    fn choose_vehicle(&self, package: PackageId, rng: &mut impl Rng) -> Option<VehicleId> {
        let package = self.state.package(package);
        let at = package.location()?;
        let check_capacity = self.domain.features().capacity;
        let able: Vec<VehicleId> = self
            .state
            .vehicles()
            .filter(|v| !check_capacity || package.size() <= v.current_capacity())
            .filter(|v| v.location().is_some_and(|l| self.distances.is_reachable(l, at)))
            .map(|v| v.id())
            .collect();
        if able.is_empty() {
            return None;
        }
        Some(able[rng.random_range(0..able.len())])
    }

    fn deliver_cargo(&mut self, vehicle: VehicleId) -> Option<()> {
        while !self.state.vehicle(vehicle).cargo().is_empty() {
            let v = self.state.vehicle(vehicle);
            let from = v.location()?;
            let targets: Vec<LocationId> = v
                .cargo()
                .iter()
                .map(|&p| self.state.package(p).target())
                .collect();
            let target = self.distances.nearest(from, &targets)?;
            let path = self.distances.path(from, target)?;
            self.follow(vehicle, &path, None)?;
        }
        Some(())
    }

    fn deliver(&mut self, vehicle: VehicleId, package: PackageId) -> Option<()> {
        let from = self.state.vehicle(vehicle).location()?;
        let p = self.state.package(package);
        let (at, target) = (p.location()?, p.target());
        let mut path = self.distances.path(from, at)?;
        path.extend(self.distances.path(at, target)?);
        self.follow(vehicle, &path, Some(package))
    }

    /// Drives `path`, unloading and loading at every stop.
    fn follow(&mut self, vehicle: VehicleId, path: &[RoadId], reserved: Option<PackageId>) -> Option<()> {
        let network = Arc::clone(self.state.network());
        let start = self.state.vehicle(vehicle).location()?;
        let stops: Vec<LocationId> = std::iter::once(start)
            .chain(path.iter().map(|&r| network.road(r).to()))
            .collect();

        let mut reserved = reserved;
        for (i, &stop) in stops.iter().enumerate() {
            if i > 0 {
                self.drive(vehicle, path[i - 1])?;
            }
            self.unload(vehicle, stop)?;
            self.load(vehicle, stop, &stops[i + 1..], &mut reserved)?;
        }
        Some(())
    }

    fn unload(&mut self, vehicle: VehicleId, stop: LocationId) -> Option<()> {
        let due: Vec<PackageId> = self
            .state
            .vehicle(vehicle)
            .cargo()
            .iter()
            .copied()
            .filter(|&p| self.state.package(p).target() == stop)
            .collect();
        for package in due {
            let action = self.domain.drop(&self.state, vehicle, package);
            self.step(action)?;
        }
        Some(())
    }

    /// Loads packages waiting at `stop` whose target is in `ahead`.
    ///
    /// The reserved package is loaded first; until then its size stays free.
    fn load(
        &mut self,
        vehicle: VehicleId,
        stop: LocationId,
        ahead: &[LocationId],
        reserved: &mut Option<PackageId>,
    ) -> Option<()> {
        let mut candidates: Vec<PackageId> = self
            .state
            .unfinished_packages()
            .filter(|p| p.location() == Some(stop) && ahead.contains(&p.target()))
            .map(|p| p.id())
            .collect();
        if let Some(pos) = (*reserved).and_then(|r| candidates.iter().position(|&p| p == r)) {
            let first = candidates.remove(pos);
            candidates.insert(0, first);
        }

        let check_capacity = self.domain.features().capacity;
        for package in candidates {
            let size = self.state.package(package).size();
            let keep = match *reserved {
                Some(r) if r != package => self.state.package(r).size(),
                _ => Cost::ZERO,
            };
            if check_capacity && size > self.state.vehicle(vehicle).current_capacity() - keep {
                continue;
            }
            let action = self.domain.pick_up(&self.state, vehicle, package);
            self.step(action)?;
            if *reserved == Some(package) {
                *reserved = None;
            }
        }
        Some(())
    }

    fn drive(&mut self, vehicle: VehicleId, road: RoadId) -> Option<()> {
        if self.domain.features().fuel {
            let burn = self.state.network().road(road).fuel_cost()?;
            if self.state.vehicle(vehicle).current_fuel()? < burn {
                let refuel = self.domain.refuel(&self.state, vehicle).ok()?;
                self.step(refuel)?;
            }
        }
        let action = self.domain.drive(&self.state, vehicle, road);
        self.step(action)
    }

    fn step(&mut self, action: Action) -> Option<()> {
        let next = self.state.try_apply(&action)?;
        self.duration += action.duration();
        if self.bound.is_some_and(|b| self.duration >= b) {
            return None;
        }
        self.state = next;
        self.actions.push(action);
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::PlanValidator;
    use crate::fixtures;
    use crate::models::{PackageSpec, RoadNetwork, VehicleSpec};
    use std::thread;
    use std::time::Duration;

    fn small(restarts: usize) -> RandomizedRestartPlanner {
        RandomizedRestartPlanner::new()
            .with_config(RandomizedConfig::default().with_max_restarts(restarts))
    }

    #[test]
    fn test_two_trucks() {
        let domain = Domain::sequential("transport");
        let state = fixtures::two_truck_state();
        let outcome = RandomizedRestartPlanner::new().search(&domain, &state).expect("compatible");

        assert_eq!(outcome.status, SearchStatus::GoalFound);
        assert_eq!(outcome.stats.expanded, 1000);
        let plan = outcome.plan.expect("plan");
        assert_eq!(plan.total_duration(), Cost::new(54));
        assert!(PlanValidator::new(&domain).validate(&state, &plan).reaches_goal());
    }

    #[test]
    fn test_deterministic_for_seed() {
        let domain = Domain::sequential("transport");
        let state = fixtures::grid_state();
        let a = small(30).plan(&domain, &state).expect("plan");
        let b = small(30).plan(&domain, &state).expect("plan");
        assert_eq!(a.to_string(), b.to_string());
        assert!(PlanValidator::new(&domain).validate(&state, &a).reaches_goal());
    }

    #[test]
    fn test_refuels_on_the_way() {
        let domain = Domain::builder("fuel").fuel(true).build();
        let state = fixtures::fuel_state(5);
        let plan = small(5).plan(&domain, &state).expect("plan");
        assert_eq!(plan.actions()[0].to_string(), "refuel[truck-1 @ A]");
        assert_eq!(plan.total_duration(), Cost::new(32));
        assert!(PlanValidator::new(&domain).validate(&state, &plan).reaches_goal());
    }

    #[test]
    fn test_initial_cargo_and_vehicle_target() {
        let network = Arc::new(
            RoadNetwork::builder()
                .location("a", 0.0, 0.0)
                .location("b", 1.0, 0.0)
                .location("c", 2.0, 0.0)
                .two_way_road("a", "b", 4)
                .two_way_road("b", "c", 6)
                .build()
                .expect("network"),
        );
        let state = WorldState::builder(network)
            .vehicle(VehicleSpec::new("truck-1", "a", 2).with_cargo("p1").with_target("a"))
            .package(PackageSpec::carried("p1", "c"))
            .build()
            .expect("problem");
        let domain = Domain::sequential("transport");

        let plan = small(3).plan(&domain, &state).expect("plan");
        // a -> b -> c, drop, c -> b -> a.
        assert_eq!(plan.len(), 5);
        assert_eq!(plan.total_duration(), Cost::new(21));
        assert!(PlanValidator::new(&domain).validate(&state, &plan).reaches_goal());
    }

    #[test]
    fn test_unreachable_package() {
        let network = Arc::new(
            RoadNetwork::builder()
                .location("a", 0.0, 0.0)
                .location("b", 1.0, 0.0)
                .road("b", "a", 5)
                .build()
                .expect("network"),
        );
        let state = WorldState::builder(network)
            .vehicle(VehicleSpec::new("truck-1", "a", 1))
            .package(PackageSpec::at("p1", "b", "a"))
            .build()
            .expect("problem");

        let outcome = small(5)
            .search(&Domain::sequential("transport"), &state)
            .expect("compatible");
        assert_eq!(outcome.status, SearchStatus::Exhausted);
        assert!(outcome.plan.is_none());
    }

    #[test]
    fn test_pending_cancel_stops_next_search() {
        let domain = Domain::sequential("transport");
        let planner = small(10);
        assert!(!planner.cancel());

        let outcome = planner.search(&domain, &fixtures::two_truck_state()).expect("compatible");
        assert_eq!(outcome.status, SearchStatus::Cancelled);
        assert_eq!(outcome.stats.expanded, 0);
        assert!(outcome.plan.is_none());
        assert!(!planner.cancellation_token().is_cancelled());
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let domain = Domain::sequential("transport");
        let state = fixtures::grid_state();
        let planner = Arc::new(small(1_000_000));

        let worker = {
            let planner = Arc::clone(&planner);
            let (domain, state) = (domain.clone(), state.clone());
            thread::spawn(move || planner.search(&domain, &state).expect("compatible"))
        };
        while !planner.is_planning() && !worker.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }
        thread::sleep(Duration::from_millis(20));
        assert!(planner.cancel() || worker.is_finished());

        let outcome = worker.join().expect("search thread");
        assert_eq!(outcome.status, SearchStatus::Cancelled);
        assert!(outcome.stats.expanded < 1_000_000);
        if let Some(plan) = outcome.plan {
            assert!(PlanValidator::new(&domain).validate(&state, &plan).reaches_goal());
        }
    }
}
