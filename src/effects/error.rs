//! Errors returned by transition requests.

use crate::core::{EntityId, Rejection};
use crate::persistence::PersistenceError;
use crate::policy::PolicyViolation;
use thiserror::Error;

/// Why a transition request did not go through.
///
/// `IllegalTransition` and `PolicyRejected` are ordinary outcomes of asking
/// for a move the lifecycle does not allow; they are returned, not panicked,
/// and the entity is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Entity {id} not found")]
    EntityNotFound { id: EntityId },

    #[error("Illegal transition of entity {id} from '{from}' to '{to}': {rejection}")]
    IllegalTransition {
        id: EntityId,
        from: String,
        to: String,
        rejection: Rejection,
    },

    #[error(
        "Transition of entity {id} from '{from}' to '{to}' violates {count} policy rule(s)",
        count = .violations.len()
    )]
    PolicyRejected {
        id: EntityId,
        from: String,
        to: String,
        violations: Vec<PolicyViolation>,
    },

    #[error("Entity {id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict { id: EntityId, expected: u64, found: u64 },

    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl TransitionError {
    /// The request was refused by the table or the policy.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::IllegalTransition { .. } | Self::PolicyRejected { .. }
        )
    }

    /// Re-reading the entity and asking again may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
