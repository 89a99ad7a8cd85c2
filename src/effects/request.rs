//! Transition requests and bulk outcomes.

use super::error::TransitionError;
use crate::core::{EntityId, ShipmentDetails, State, StatefulEntity, TransitionDetails};

/// A request to move one entity to a new status.
#[derive(Clone, Debug)]
pub struct TransitionRequest<S: State> {
    pub entity_id: EntityId,
    pub target: S,
    pub reason: Option<String>,
    pub actor: Option<String>,
    pub notes: Option<String>,
    pub shipment: Option<ShipmentDetails>,
}

impl<S: State> TransitionRequest<S> {
    pub fn new(entity_id: EntityId, target: S) -> Self {
        Self {
            entity_id,
            target,
            reason: None,
            actor: None,
            notes: None,
            shipment: None,
        }
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn shipment(mut self, shipment: ShipmentDetails) -> Self {
        self.shipment = Some(shipment);
        self
    }

    pub(crate) fn into_details(self) -> (S, TransitionDetails) {
        let details = TransitionDetails {
            reason: self.reason,
            actor: self.actor,
            notes: self.notes,
            shipment: self.shipment,
        };
        (self.target, details)
    }
}

/// The same transition, requested for many entities at once.
///
/// Every entity gets its own record carrying this reason, actor and notes.
#[derive(Clone, Debug)]
pub struct BulkRequest<S: State> {
    pub target: S,
    pub reason: Option<String>,
    pub actor: Option<String>,
    pub notes: Option<String>,
}

impl<S: State> BulkRequest<S> {
    pub fn new(target: S) -> Self {
        Self {
            target,
            reason: None,
            actor: None,
            notes: None,
        }
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// The single-entity request for `entity_id`.
    pub fn for_entity(&self, entity_id: EntityId) -> TransitionRequest<S> {
        TransitionRequest {
            entity_id,
            target: self.target.clone(),
            reason: self.reason.clone(),
            actor: self.actor.clone(),
            notes: self.notes.clone(),
            shipment: None,
        }
    }
}

/// Per-entity results of a bulk transition.
#[derive(Debug)]
pub struct BulkOutcome<S: State> {
    pub succeeded: Vec<StatefulEntity<S>>,
    pub failed: Vec<(EntityId, TransitionError)>,
}

impl<S: State> BulkOutcome<S> {
    /// Every entity was transitioned.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}
