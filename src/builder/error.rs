//! Errors raised while assembling a machine definition.

use thiserror::Error;

/// A single problem found in a machine definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("No states declared. Add at least one state")]
    NoStates,

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial state '{state}' is not a declared state")]
    UndeclaredInitialState { state: String },

    #[error("State '{state}' referenced from '{referenced_from}' is not declared")]
    UndeclaredState {
        state: String,
        referenced_from: String,
    },
}

/// Every problem found while validating a machine definition.
///
/// Validation does not stop at the first problem, so a single pass reports
/// all of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid machine definition: {}", describe(.errors))]
pub struct InvalidDefinition {
    pub errors: Vec<DefinitionError>,
}

fn describe(errors: &[DefinitionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
