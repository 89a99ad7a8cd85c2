//! Persistence error types.

use crate::core::EntityId;
use thiserror::Error;

/// Errors a repository can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The stored version moved on since the entity was loaded
    #[error("Version conflict on entity {id}: expected {expected}, found {found}")]
    VersionConflict {
        id: EntityId,
        expected: u64,
        found: u64,
    },

    /// An insert collided with an existing entity
    #[error("Entity {id} already exists")]
    AlreadyExists { id: EntityId },

    /// An update targeted an entity that is no longer stored
    #[error("Entity {id} is not stored")]
    Missing { id: EntityId },

    /// The backing store could not serve the request
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
