//! Builder API for ergonomic definition construction.
//!
//! This module provides the fluent definition builder and the `state_enum!`
//! macro for declaring typed statuses with little boilerplate.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{DefinitionError, InvalidDefinition};
pub use machine::MachineDefinitionBuilder;
