//! Plan validation.
//!
//! Replays a plan from its initial state through the same two-phase apply
//! the planners use, checking every precondition and effect on the way.

mod validator;

pub use validator::{PlanValidator, StepTrace, ValidationFailure, ValidationPhase, ValidationReport};
