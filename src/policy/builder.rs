//! Builder API for creating transition policies.

use crate::core::State;
use crate::policy::context::TransitionContext;
use crate::policy::rules::{PolicyCheck, TransitionPolicy};
use crate::policy::violations::PolicyViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating transition policies
pub struct PolicyBuilder<S: State> {
    reason_required_for: Vec<S>,
    actor_required: bool,
    required_checks: Vec<PolicyCheck<S>>,
}

impl<S: State> PolicyBuilder<S> {
    pub fn new() -> Self {
        Self {
            reason_required_for: Vec::new(),
            actor_required: false,
            required_checks: Vec::new(),
        }
    }

    /// Require a non-blank reason when moving to `target`
    pub fn require_reason_for(mut self, target: S) -> Self {
        if !self.reason_required_for.contains(&target) {
            self.reason_required_for.push(target);
        }
        self
    }

    /// Require every transition to name who requested it
    pub fn require_actor(mut self) -> Self {
        self.actor_required = true;
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&TransitionContext<S>) -> Validation<(), NonEmptyVec<PolicyViolation>>
            + Send
            + Sync
            + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&TransitionContext<S>) -> bool + Send + Sync + 'static,
    {
        let check = move |ctx: &TransitionContext<S>| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(PolicyViolation::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    /// Build the policy
    pub fn build(self) -> TransitionPolicy<S> {
        TransitionPolicy {
            reason_required_for: self.reason_required_for,
            actor_required: self.actor_required,
            required_checks: self.required_checks,
        }
    }
}

impl<S: State> Default for PolicyBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
