//! Transition policies evaluated with Validation.

use crate::core::State;
use crate::policy::context::TransitionContext;
use crate::policy::violations::PolicyViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for policy check functions
pub type PolicyCheck<S> = Box<
    dyn Fn(&TransitionContext<S>) -> Validation<(), NonEmptyVec<PolicyViolation>> + Send + Sync,
>;

/// Domain rules a transition must satisfy on top of the table.
/// Uses Validation to accumulate ALL violations.
pub struct TransitionPolicy<S: State> {
    pub(crate) reason_required_for: Vec<S>,
    pub(crate) actor_required: bool,
    pub(crate) required_checks: Vec<PolicyCheck<S>>,
}

impl<S: State> TransitionPolicy<S> {
    /// Enforce all rules, accumulating ALL violations.
    /// Returns Validation::Success(()) if all checks pass.
    /// Returns Validation::Failure with ALL violations if any fail.
    pub fn enforce(
        &self,
        context: &TransitionContext<S>,
    ) -> Validation<(), NonEmptyVec<PolicyViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<PolicyViolation>>> = Vec::new();

        if self.reason_required_for.contains(&context.to) && !context.has_reason() {
            checks.push(Validation::fail(PolicyViolation::ReasonRequired {
                to: context.to.name().to_string(),
            }));
        }

        if self.actor_required && !context.has_actor() {
            checks.push(Validation::fail(PolicyViolation::ActorRequired));
        }

        for check_fn in &self.required_checks {
            checks.push(check_fn(context));
        }

        if checks.is_empty() {
            return Validation::success(());
        }
        Validation::all_vec(checks).map(|_| ())
    }

    /// Violations as a plain list; empty when the transition is allowed.
    pub fn violations(&self, context: &TransitionContext<S>) -> Vec<PolicyViolation> {
        match self.enforce(context) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }
}
