//! Pure legality checks against a transition table.
//!
//! Nothing here has side effects; the executor calls these before touching
//! an entity.

use super::definition::MachineDefinition;
use super::state::State;
use thiserror::Error;

/// Why a transition is not in the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("state '{state}' is not part of this machine")]
    UnknownState { state: String },

    #[error("state '{state}' is terminal")]
    Terminal { state: String },

    #[error("transition is not listed in the table")]
    NotAllowed,
}

/// Check a transition, explaining a refusal.
///
/// Fails closed: an unknown current or requested status is rejected. A
/// status equal to the current one is only accepted when the table lists
/// that self-loop.
pub fn check_transition<S: State>(
    definition: &MachineDefinition<S>,
    from: &S,
    to: &S,
) -> Result<(), Rejection> {
    for state in [from, to] {
        if !definition.contains(state) {
            return Err(Rejection::UnknownState {
                state: state.name().to_string(),
            });
        }
    }

    let successors = definition.successors(from);
    if successors.is_empty() {
        return Err(Rejection::Terminal {
            state: from.name().to_string(),
        });
    }

    if successors.contains(to) {
        Ok(())
    } else {
        Err(Rejection::NotAllowed)
    }
}

/// Whether the table allows moving from `from` to `to`.
///
/// # Example
///
/// ```rust
/// use statusflow::core::{can_transition, MachineDefinition};
///
/// let definition: MachineDefinition<String> = MachineDefinition::builder()
///     .states(["pending", "shipped", "delivered"].map(String::from))
///     .initial("pending".to_string())
///     .allow("pending".to_string(), ["shipped".to_string()])
///     .allow("shipped".to_string(), ["delivered".to_string()])
///     .build()
///     .unwrap();
///
/// let pending = "pending".to_string();
/// assert!(can_transition(&definition, &pending, &"shipped".to_string()));
/// assert!(!can_transition(&definition, &pending, &"delivered".to_string()));
/// ```
pub fn can_transition<S: State>(definition: &MachineDefinition<S>, from: &S, to: &S) -> bool {
    check_transition(definition, from, to).is_ok()
}

/// Statuses the table allows from `from`; empty when terminal or unknown.
pub fn available_transitions<'a, S: State>(
    definition: &'a MachineDefinition<S>,
    from: &S,
) -> &'a [S] {
    definition.successors(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Draft,
        Review,
        Published,
        Archived,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Draft => "draft",
                Self::Review => "review",
                Self::Published => "published",
                Self::Archived => "archived",
            }
        }
    }

    fn definition() -> MachineDefinition<TestState> {
        MachineDefinition::builder()
            .states([TestState::Draft, TestState::Review, TestState::Published])
            .initial(TestState::Draft)
            .allow(TestState::Draft, [TestState::Review])
            .allow(TestState::Review, [TestState::Draft, TestState::Review, TestState::Published])
            .build()
            .unwrap()
    }

    #[test]
    fn listed_transition_is_legal() {
        let definition = definition();
        assert!(can_transition(&definition, &TestState::Draft, &TestState::Review));
        assert!(can_transition(&definition, &TestState::Review, &TestState::Draft));
    }

    #[test]
    fn skipping_a_step_is_illegal() {
        assert_eq!(
            check_transition(&definition(), &TestState::Draft, &TestState::Published),
            Err(Rejection::NotAllowed)
        );
    }

    #[test]
    fn unknown_current_state_fails_closed() {
        assert_eq!(
            check_transition(&definition(), &TestState::Archived, &TestState::Draft),
            Err(Rejection::UnknownState {
                state: "archived".into()
            })
        );
    }

    #[test]
    fn unknown_target_state_is_illegal() {
        assert!(!can_transition(&definition(), &TestState::Review, &TestState::Archived));
    }

    #[test]
    fn terminal_state_rejects_everything() {
        let definition = definition();
        for target in definition.states().to_vec() {
            assert_eq!(
                check_transition(&definition, &TestState::Published, &target),
                Err(Rejection::Terminal {
                    state: "published".into()
                })
            );
        }
    }

    #[test]
    fn self_transition_requires_explicit_loop() {
        let definition = definition();
        assert!(!can_transition(&definition, &TestState::Draft, &TestState::Draft));
        assert!(can_transition(&definition, &TestState::Review, &TestState::Review));
    }

    #[test]
    fn available_transitions_follow_declaration_order() {
        let definition = definition();
        assert_eq!(
            available_transitions(&definition, &TestState::Review),
            &[TestState::Draft, TestState::Review, TestState::Published]
        );
        assert!(available_transitions(&definition, &TestState::Published).is_empty());
        assert!(available_transitions(&definition, &TestState::Archived).is_empty());
    }
}
