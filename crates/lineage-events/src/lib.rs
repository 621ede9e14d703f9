//! Event eligibility, choice resolution, and trigger cascades for the
//! Lineage simulation.
//!
//! Events are data; this crate interprets them. Conditions are evaluated
//! against the state with an injected RNG, effect actions are dispatched
//! through an [`ActionRegistry`] of plain functions that return
//! [`StatePatch`]es, and every entry point maps `&GameState` to a new
//! state.
//!
//! # Modules
//!
//! - [`condition`] -- [`EventCondition`](lineage_types::EventCondition) evaluation
//! - [`evaluator`] -- Eligibility filtering and the uniform draw
//! - [`registry`] -- Action kind to handler dispatch
//! - [`milestones`] -- Marriage, childbirth, and death
//! - [`handlers`] -- Relationship, job, pet, loan, and club actions
//! - [`patch`] -- Validated partial state updates
//! - [`resolution`] -- Offering, resolving, and draining the trigger queue
//! - [`error`] -- Error types ([`EventError`])

pub mod condition;
pub mod error;
pub mod evaluator;
pub mod handlers;
pub mod milestones;
pub mod patch;
pub mod registry;
pub mod resolution;

#[cfg(test)]
pub(crate) mod testing;

pub use condition::evaluate_condition;
pub use error::EventError;
pub use evaluator::{draw_event, evaluate_eligible_events};
pub use milestones::kill_character;
pub use patch::StatePatch;
pub use registry::{ActionContext, ActionHandler, ActionRegistry};
pub use resolution::{
    ChoiceResolution, EventContext, drain_trigger_queue, offer_drawn_event, offer_event,
    resolve_choice,
};
