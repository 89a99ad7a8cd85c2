//! Transition tables.
//!
//! A [`MachineDefinition`] names the statuses of a lifecycle, its single
//! entry status, and for every status the statuses it may move to next.
//! Definitions are validated when they are built or deserialized; a value of
//! this type always satisfies its invariants.

use super::state::State;
use super::validator;
use crate::builder::error::{DefinitionError, InvalidDefinition};
use crate::builder::MachineDefinitionBuilder;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Unvalidated, serializable shape of a machine definition.
///
/// In JSON:
///
/// ```json
/// {
///   "states": ["submitted", "approved", "rejected"],
///   "initial": "submitted",
///   "transitions": { "submitted": ["approved", "rejected"] }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct DefinitionDocument<S: State> {
    pub states: Vec<S>,
    #[serde(default)]
    pub initial: Option<S>,
    #[serde(default)]
    pub transitions: HashMap<S, Vec<S>>,
}

/// A validated transition table.
///
/// Invariants:
/// - at least one state is declared, and no state is declared twice
/// - the initial state is declared
/// - every state used as a source or target in `transitions` is declared
///
/// Statuses without outgoing transitions are terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    bound = "",
    try_from = "DefinitionDocument<S>",
    into = "DefinitionDocument<S>"
)]
pub struct MachineDefinition<S: State> {
    states: Vec<S>,
    initial: S,
    transitions: HashMap<S, Vec<S>>,
}

impl<S: State> MachineDefinition<S> {
    /// Start building a definition.
    pub fn builder() -> MachineDefinitionBuilder<S> {
        MachineDefinitionBuilder::new()
    }

    /// Parse and validate a definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The entry status every new entity starts in.
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Declared statuses in declaration order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn contains(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    /// Statuses reachable from `state` in one step, in declaration order.
    ///
    /// Empty for terminal and for unknown statuses.
    pub fn successors(&self, state: &S) -> &[S] {
        self.transitions
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// A declared status with no outgoing transitions.
    pub fn is_terminal(&self, state: &S) -> bool {
        self.contains(state) && self.successors(state).is_empty()
    }

    pub fn terminal_states(&self) -> Vec<&S> {
        self.states
            .iter()
            .filter(|state| self.successors(state).is_empty())
            .collect()
    }

    /// Shorthand for [`validator::can_transition`].
    pub fn can_transition(&self, from: &S, to: &S) -> bool {
        validator::can_transition(self, from, to)
    }
}

impl<S: State> TryFrom<DefinitionDocument<S>> for MachineDefinition<S> {
    type Error = InvalidDefinition;

    fn try_from(document: DefinitionDocument<S>) -> Result<Self, Self::Error> {
        if let Validation::Failure(errors) = validate(&document) {
            return Err(InvalidDefinition {
                errors: errors.iter().cloned().collect(),
            });
        }

        let DefinitionDocument {
            states,
            initial,
            transitions,
        } = document;

        let initial = initial.ok_or_else(|| InvalidDefinition {
            errors: vec![DefinitionError::MissingInitialState],
        })?;

        let transitions = transitions
            .into_iter()
            .map(|(from, targets)| {
                let mut seen = HashSet::new();
                let targets: Vec<S> = targets
                    .into_iter()
                    .filter(|target| seen.insert(target.clone()))
                    .collect();
                (from, targets)
            })
            .collect();

        Ok(Self {
            states,
            initial,
            transitions,
        })
    }
}

impl<S: State> From<MachineDefinition<S>> for DefinitionDocument<S> {
    fn from(definition: MachineDefinition<S>) -> Self {
        Self {
            states: definition.states,
            initial: Some(definition.initial),
            transitions: definition.transitions,
        }
    }
}

/// Check every definition invariant, accumulating ALL problems.
fn validate<S: State>(document: &DefinitionDocument<S>) -> Validation<(), NonEmptyVec<DefinitionError>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<DefinitionError>>> = Vec::new();

    if document.states.is_empty() {
        checks.push(Validation::fail(DefinitionError::NoStates));
    }

    let mut declared = HashSet::new();
    for state in &document.states {
        if !declared.insert(state) {
            checks.push(Validation::fail(DefinitionError::DuplicateState {
                state: state.name().to_string(),
            }));
        }
    }

    match &document.initial {
        None => checks.push(Validation::fail(DefinitionError::MissingInitialState)),
        Some(initial) if !declared.contains(initial) => {
            checks.push(Validation::fail(DefinitionError::UndeclaredInitialState {
                state: initial.name().to_string(),
            }));
        }
        Some(_) => {}
    }

    for (from, targets) in &document.transitions {
        if !declared.contains(from) {
            checks.push(Validation::fail(DefinitionError::UndeclaredState {
                state: from.name().to_string(),
                referenced_from: "transitions".to_string(),
            }));
        }
        for target in targets {
            if !declared.contains(target) {
                checks.push(Validation::fail(DefinitionError::UndeclaredState {
                    state: target.name().to_string(),
                    referenced_from: from.name().to_string(),
                }));
            }
        }
    }

    if checks.is_empty() {
        return Validation::success(());
    }
    Validation::all_vec(checks).map(|_| ())
}
