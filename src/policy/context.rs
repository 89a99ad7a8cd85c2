//! Context provided to policy checks.

use crate::core::{EntityId, State};
use chrono::{DateTime, Utc};

/// Everything a policy check may look at for one requested transition.
#[derive(Clone, Debug)]
pub struct TransitionContext<S: State> {
    pub entity_id: EntityId,
    pub from: S,
    pub to: S,
    pub reason: Option<String>,
    pub actor: Option<String>,
    pub requested_at: DateTime<Utc>,
}

impl<S: State> TransitionContext<S> {
    /// A reason was given and is not blank.
    pub fn has_reason(&self) -> bool {
        non_blank(self.reason.as_deref())
    }

    /// An actor was given and is not blank.
    pub fn has_actor(&self) -> bool {
        non_blank(self.actor.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
