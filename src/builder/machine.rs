//! Builder for constructing machine definitions.

use crate::builder::error::InvalidDefinition;
use crate::core::{DefinitionDocument, MachineDefinition, State};
use std::collections::HashMap;

/// Builder for machine definitions with a fluent API.
///
/// The builder records what it is told and checks nothing until
/// [`build`](Self::build), which reports every problem at once.
pub struct MachineDefinitionBuilder<S: State> {
    states: Vec<S>,
    initial: Option<S>,
    transitions: HashMap<S, Vec<S>>,
}

impl<S: State> MachineDefinitionBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: None,
            transitions: HashMap::new(),
        }
    }

    /// Declare a status.
    pub fn state(mut self, state: S) -> Self {
        self.states.push(state);
        self
    }

    /// Declare several statuses at once.
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.states.extend(states);
        self
    }

    /// Set the initial status (required, must be declared).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Allow `from` to move to each of `targets`.
    ///
    /// Calling this again for the same `from` adds to its successor set.
    pub fn allow<I>(mut self, from: S, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.transitions.entry(from).or_default().extend(targets);
        self
    }

    /// Mark `state` as terminal explicitly.
    ///
    /// Statuses without an entry in the table are terminal anyway; this
    /// only makes the intent show up in serialized tables.
    pub fn terminal(mut self, state: S) -> Self {
        self.transitions.entry(state).or_default();
        self
    }

    /// Validate and build the definition.
    pub fn build(self) -> Result<MachineDefinition<S>, InvalidDefinition> {
        MachineDefinition::try_from(DefinitionDocument {
            states: self.states,
            initial: self.initial,
            transitions: self.transitions,
        })
    }
}

impl<S: State> Default for MachineDefinitionBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
