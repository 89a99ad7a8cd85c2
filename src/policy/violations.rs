//! Policy violations.

use thiserror::Error;

/// A domain rule a requested transition failed to satisfy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("A reason is required to move to '{to}'")]
    ReasonRequired { to: String },

    #[error("The requesting actor must be identified")]
    ActorRequired,

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
