//! Status history tracking.
//!
//! Every accepted transition leaves one immutable [`TransitionRecord`]
//! behind. Records are only ever appended; nothing in this crate edits or
//! removes one.

use super::state::State;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Audit entry for a single accepted status change.
///
/// # Example
///
/// ```rust
/// use statusflow::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     reason: Some("payment received".to_string()),
///     ..TransitionRecord::new("pending".to_string(), "confirmed".to_string(), Utc::now())
/// };
/// assert_eq!(record.to, "confirmed");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// Identifier of this record
    pub id: Uuid,
    /// The status being left
    pub from: S,
    /// The status being entered
    pub to: S,
    /// When the transition was accepted
    pub timestamp: DateTime<Utc>,
    /// Why the change was requested
    #[serde(default)]
    pub reason: Option<String>,
    /// Who requested the change
    #[serde(default)]
    pub actor: Option<String>,
    /// Free-form operator notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Carrier details given when goods change hands
    #[serde(default)]
    pub shipment: Option<ShipmentDetails>,
}

impl<S: State> TransitionRecord<S> {
    /// A record with a fresh id and no details.
    pub fn new(from: S, to: S, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            timestamp,
            reason: None,
            actor: None,
            notes: None,
            shipment: None,
        }
    }
}

/// Tracking information attached to a shipping transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentDetails {
    pub tracking_number: String,
    #[serde(default)]
    pub estimated_delivery: Option<DateTime<Utc>>,
}

impl ShipmentDetails {
    pub fn new(tracking_number: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            estimated_delivery: None,
        }
    }

    pub fn estimated_delivery(mut self, at: DateTime<Utc>) -> Self {
        self.estimated_delivery = Some(at);
        self
    }
}

/// Caller-supplied context stored with an accepted transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionDetails {
    pub reason: Option<String>,
    pub actor: Option<String>,
    pub notes: Option<String>,
    pub shipment: Option<ShipmentDetails>,
}

/// Ordered, append-only history of status changes.
///
/// `record` returns a new history with the entry added and leaves the
/// original untouched.
///
/// # Example
///
/// ```rust
/// use statusflow::core::{StatusHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = StatusHistory::new();
/// let history = history.record(TransitionRecord {
///     actor: Some("admin-7".to_string()),
///     ..TransitionRecord::new("submitted".to_string(), "approved".to_string(), Utc::now())
/// });
///
/// let path = history.path();
/// assert_eq!(path.len(), 2); // submitted -> approved
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StatusHistory<S: State> {
    transitions: Vec<TransitionRecord<S>>,
}

impl<S: State> Default for StatusHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StatusHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// ```rust
    /// use statusflow::core::{StatusHistory, TransitionRecord};
    /// use chrono::Utc;
    ///
    /// let history = StatusHistory::new();
    /// let record = TransitionRecord::new("a".to_string(), "b".to_string(), Utc::now());
    ///
    /// let new_history = history.record(record);
    /// assert_eq!(new_history.len(), 1);
    /// assert_eq!(history.len(), 0); // Original unchanged
    /// ```
    pub fn record(&self, transition: TransitionRecord<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Timestamp to stamp the next record with.
    ///
    /// Returns `now` unless that would not be strictly later than the last
    /// recorded timestamp, in which case the last timestamp plus one
    /// microsecond is used. History timestamps therefore never repeat or go
    /// backwards, even under clock skew.
    pub fn next_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.transitions.last() {
            Some(last) if now <= last.timestamp => {
                last.timestamp + ChronoDuration::microseconds(1)
            }
            _ => now,
        }
    }

    /// Get the path of statuses traversed.
    ///
    /// The first element is the `from` of the first record, followed by the
    /// `to` of each record. Empty when nothing has been recorded.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time elapsed between the first and last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord<S>> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// All records, oldest first.
    pub fn transitions(&self) -> &[TransitionRecord<S>] {
        &self.transitions
    }
}
