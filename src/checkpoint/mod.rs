//! Checkpoints of stored entities.
//!
//! A checkpoint captures every entity of a repository, with its full status
//! history, so an in-memory store can survive a restart or be seeded in
//! tests. JSON is offered for readability and bincode for compactness.

use crate::core::{State, StatefulEntity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable checkpoint of a set of entities.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: State> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Every captured entity
    pub entities: Vec<StatefulEntity<S>>,
}

impl<S: State> Checkpoint<S> {
    pub fn new(entities: Vec<StatefulEntity<S>>) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            entities,
        }
    }

    /// Check the format version, that no entity appears twice, and that
    /// every entity agrees with its own history.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        let mut seen = HashSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.id()) {
                return Err(CheckpointError::DuplicateEntity { id: entity.id() });
            }
            check_entity(entity)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a JSON checkpoint.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode and validate a bincode checkpoint.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }
}

fn check_entity<S: State>(entity: &StatefulEntity<S>) -> Result<(), CheckpointError> {
    let id = entity.id();
    let records = entity.status_history().transitions();

    if entity.version() != records.len() as u64 {
        return Err(CheckpointError::VersionMismatch {
            id,
            version: entity.version(),
            recorded: records.len(),
        });
    }

    if let Some(last) = records.last() {
        if &last.to != entity.status() {
            return Err(CheckpointError::StatusMismatch {
                id,
                status: entity.status().name().to_string(),
                recorded: last.to.name().to_string(),
            });
        }
    }

    for (offset, pair) in records.windows(2).enumerate() {
        if pair[0].to != pair[1].from || pair[0].timestamp >= pair[1].timestamp {
            return Err(CheckpointError::BrokenHistory {
                id,
                index: offset + 1,
            });
        }
    }

    Ok(())
}
