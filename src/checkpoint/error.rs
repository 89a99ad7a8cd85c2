//! Checkpoint error types.

use crate::core::EntityId;
use thiserror::Error;

/// Reasons a checkpoint cannot be written or read back.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("JSON checkpoint encoding failed")]
    Json(#[from] serde_json::Error),

    #[error("binary checkpoint encoding failed")]
    Binary(#[from] bincode::Error),

    #[error("unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("entity {id} appears more than once")]
    DuplicateEntity { id: EntityId },

    /// `version` must equal the number of recorded transitions.
    #[error("entity {id} is at version {version} but has {recorded} recorded transitions")]
    VersionMismatch {
        id: EntityId,
        version: u64,
        recorded: usize,
    },

    #[error("entity {id} is in '{status}' but its history ends in '{recorded}'")]
    StatusMismatch {
        id: EntityId,
        status: String,
        recorded: String,
    },

    /// Record `index` does not start where the previous one ended, or is not
    /// strictly later than it.
    #[error("history of entity {id} is broken at record {index}")]
    BrokenHistory { id: EntityId, index: usize },
}
