//! Entities whose status is governed by a machine definition.

use super::definition::MachineDefinition;
use super::history::{StatusHistory, TransitionDetails, TransitionRecord};
use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque entity identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An entity with a governed status and its audit trail.
///
/// The status only changes through
/// [`TransitionExecutor`](crate::effects::TransitionExecutor); there is no
/// public setter. `version` counts accepted transitions and backs the
/// optimistic concurrency check on save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StatefulEntity<S: State> {
    id: EntityId,
    status: S,
    status_history: StatusHistory<S>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<S: State> StatefulEntity<S> {
    /// Create an entity in the definition's initial status.
    pub fn new(definition: &MachineDefinition<S>) -> Self {
        Self::with_id(EntityId::new(), definition)
    }

    /// Create an entity with a caller-chosen identifier.
    pub fn with_id(id: EntityId, definition: &MachineDefinition<S>) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: definition.initial().clone(),
            status_history: StatusHistory::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn status_history(&self) -> &StatusHistory<S> {
        &self.status_history
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Move to `to`, appending a record. Legality is the caller's concern.
    pub(crate) fn apply_transition(mut self, to: S, details: TransitionDetails) -> Self {
        let timestamp = self.status_history.next_timestamp(Utc::now());
        let record = TransitionRecord {
            reason: details.reason,
            actor: details.actor,
            notes: details.notes,
            shipment: details.shipment,
            ..TransitionRecord::new(self.status.clone(), to.clone(), timestamp)
        };
        self.status_history = self.status_history.record(record);
        self.status = to;
        self.version += 1;
        self.updated_at = timestamp;
        self
    }
}
