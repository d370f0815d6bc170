//! Plan validator that replays actions and reports the first failure.

use std::fmt;

use crate::domain::{Action, ActionKind, Domain, Predicate};
use crate::error::PlanningError;
use crate::models::{Cost, Plan, WorldState};

/// Which check rejected an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPhase {
    /// The action was not built from this domain's templates.
    Rules,
    /// A precondition did not hold before the action.
    Precondition,
    /// An effect did not hold after the action.
    Effect,
}

/// The first action a plan failed on.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    /// Zero-based index of the action in the plan.
    pub step: usize,
    /// The rejected action.
    pub action: Action,
    /// Which check failed.
    pub phase: ValidationPhase,
    /// The failing predicate; `None` for [`ValidationPhase::Rules`].
    pub predicate: Option<Predicate>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({}): ", self.step, self.action)?;
        match (&self.phase, &self.predicate) {
            (ValidationPhase::Rules, _) => f.write_str("action does not match the domain rules"),
            (ValidationPhase::Precondition, Some(p)) => write!(f, "precondition `{p}` failed"),
            (ValidationPhase::Effect, Some(p)) => write!(f, "effect `{p}` failed"),
            (_, None) => f.write_str("check failed"),
        }
    }
}

/// One checked action of a replayed plan.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTrace {
    /// Zero-based index of the action in the plan.
    pub step: usize,
    /// Display form of the action.
    pub action: String,
    /// Time the action starts.
    pub start: Cost,
    /// Time the action ends.
    pub end: Cost,
    /// Whether every check passed.
    pub passed: bool,
}

/// Result of validating a plan.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    trace: Vec<StepTrace>,
    failure: Option<ValidationFailure>,
    incompatible: Option<PlanningError>,
    final_state: WorldState,
}

impl ValidationReport {
    /// Returns `true` if the problem suits the domain and every action
    /// passed its checks.
    pub fn is_valid(&self) -> bool {
        self.failure.is_none() && self.incompatible.is_none()
    }

    /// The first failing action, if any.
    pub fn failure(&self) -> Option<&ValidationFailure> {
        self.failure.as_ref()
    }

    /// Why the initial state cannot be replayed under the domain at all.
    /// No action is checked in that case and the trace is empty.
    pub fn incompatibility(&self) -> Option<&PlanningError> {
        self.incompatible.as_ref()
    }

    /// One entry per checked action, up to and including a failing one.
    pub fn trace(&self) -> &[StepTrace] {
        &self.trace
    }

    /// State after the last applied action.
    pub fn final_state(&self) -> &WorldState {
        &self.final_state
    }

    /// Returns `true` if the plan is valid and its final state is a goal.
    pub fn reaches_goal(&self) -> bool {
        self.is_valid() && self.final_state.is_goal()
    }
}

/// Replays plans against a domain's rules.
///
/// Each action is checked in order: its predicates must come from the
/// domain's template for its kind, its preconditions must hold in the
/// current state, and after [`WorldState::apply`] its effects must hold in
/// the next state. Validation stops at the first failing check. A problem
/// the domain cannot plan (see [`Domain::check_problem`]) is rejected before
/// any action is replayed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_transport::domain::Domain;
/// use u_transport::evaluation::PlanValidator;
/// use u_transport::models::{PackageSpec, Plan, RoadNetwork, VehicleSpec, WorldState};
///
/// let network = RoadNetwork::builder()
///     .location("a", 0.0, 0.0)
///     .location("b", 1.0, 0.0)
///     .two_way_road("a", "b", 10)
///     .build()
///     .expect("valid network");
/// let a = network.resolve("a").expect("a");
/// let b = network.resolve("b").expect("b");
/// let state = WorldState::builder(Arc::new(network))
///     .vehicle(VehicleSpec::new("truck-1", "a", 2))
///     .package(PackageSpec::at("p1", "a", "b"))
///     .build()
///     .expect("valid problem");
///
/// let domain = Domain::sequential("transport");
/// let truck = state.vehicle_by_name("truck-1").expect("truck").id();
/// let p1 = state.package_by_name("p1").expect("package").id();
///
/// let pick = domain.pick_up(&state, truck, p1);
/// let loaded = state.apply(&pick);
/// let drive = domain.drive_between(&loaded, truck, a, b).expect("road");
/// let moved = loaded.apply(&drive);
/// let drop = domain.drop(&moved, truck, p1);
///
/// let report = PlanValidator::new(&domain).validate(&state, &Plan::new(vec![pick, drive, drop]));
/// assert!(report.is_valid());
/// assert!(report.reaches_goal());
/// assert_eq!(report.trace().len(), 3);
/// ```
pub struct PlanValidator<'a> {
    domain: &'a Domain,
}

impl<'a> PlanValidator<'a> {
    /// Creates a validator for the given domain.
    pub fn new(domain: &'a Domain) -> Self {
        Self { domain }
    }

    fn matches_rules(&self, action: &Action) -> bool {
        let template = match action.kind() {
            ActionKind::Drive { .. } => self.domain.drive_template(),
            ActionKind::PickUp { .. } => self.domain.pick_up_template(),
            ActionKind::Drop { .. } => self.domain.drop_template(),
            ActionKind::Refuel if self.domain.features().fuel => self.domain.refuel_template(),
            ActionKind::Refuel => return false,
        };
        action.preconditions() == template.preconditions() && action.effects() == template.effects()
    }

    /// Replays `plan` from `initial`.
    pub fn validate(&self, initial: &WorldState, plan: &Plan) -> ValidationReport {
        if let Err(err) = self.domain.check_problem(initial) {
            tracing::debug!(domain = self.domain.name(), error = %err, "problem does not suit domain");
            return ValidationReport {
                trace: Vec::new(),
                failure: None,
                incompatible: Some(err),
                final_state: initial.clone(),
            };
        }

        let mut state = initial.clone();
        let mut trace = Vec::with_capacity(plan.len());
        let mut clock = Cost::ZERO;

        for (step, action) in plan.actions().iter().enumerate() {
            let start = clock;
            clock += action.duration();
            let mut record = StepTrace {
                step,
                action: action.to_string(),
                start,
                end: clock,
                passed: false,
            };

            let failure = |phase, predicate: Option<&Predicate>| ValidationFailure {
                step,
                action: action.clone(),
                phase,
                predicate: predicate.cloned(),
            };

            if !self.matches_rules(action) {
                tracing::debug!(domain = self.domain.name(), step, %action, "action does not match domain rules");
                trace.push(record);
                return ValidationReport {
                    trace,
                    failure: Some(failure(ValidationPhase::Rules, None)),
                    incompatible: None,
                    final_state: state,
                };
            }

            if let Some(p) = action.failed_precondition(&state) {
                tracing::debug!(step, %action, predicate = %p, "precondition failed");
                let failure = failure(ValidationPhase::Precondition, Some(p));
                trace.push(record);
                return ValidationReport {
                    trace,
                    failure: Some(failure),
                    incompatible: None,
                    final_state: state,
                };
            }

            let next = state.apply_preconditions(action).apply_effects(action);

            if let Some(p) = action.failed_effect(&next) {
                tracing::debug!(step, %action, predicate = %p, "effect failed");
                let failure = failure(ValidationPhase::Effect, Some(p));
                trace.push(record);
                return ValidationReport {
                    trace,
                    failure: Some(failure),
                    incompatible: None,
                    final_state: next,
                };
            }

            record.passed = true;
            trace.push(record);
            state = next;
        }

        tracing::debug!(
            domain = self.domain.name(),
            actions = plan.len(),
            goal = state.is_goal(),
            "plan validated"
        );
        ValidationReport {
            trace,
            failure: None,
            incompatible: None,
            final_state: state,
        }
    }
}
