//! Core lifecycle types and logic.
//!
//! This module contains the pure part of the crate:
//! - Statuses via the `State` trait
//! - Validated transition tables
//! - The legality check over a table
//! - Immutable status history and the entities that carry it
//!
//! Nothing in this module performs I/O.

mod definition;
mod entity;
mod history;
mod state;
mod validator;

pub use definition::{DefinitionDocument, MachineDefinition};
pub use entity::{EntityId, StatefulEntity};
pub use history::{ShipmentDetails, StatusHistory, TransitionDetails, TransitionRecord};
pub use state::State;
pub use validator::{available_transitions, can_transition, check_transition, Rejection};
