//! Transport domain rule set.
//!
//! Provides the [`Domain`] rule set with its per-kind predicate templates,
//! bound [`Action`] instances for the four action kinds (drive, pick-up,
//! drop, refuel), and the [`Predicate`]s that planners and the plan
//! validator check against world states.

mod action;
mod predicate;
mod rules;

pub use action::{Action, ActionKind};
pub use predicate::{Condition, Predicate, TemporalQuantifier};
pub use rules::{ActionTemplate, Domain, DomainBuilder, DomainFeatures};
