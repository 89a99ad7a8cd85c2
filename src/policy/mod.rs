//! Validation-based transition policies.
//!
//! The transition table says which moves exist. A policy adds the domain
//! preconditions for taking one: a rejection needs a reason, an approval
//! needs an identified reviewer, and so on.
//!
//! Policies use Stillwater's `Validation` type so that every violated rule
//! is reported together instead of one at a time.
//!
//! # Example
//!
//! ```rust
//! use statusflow::policy::{PolicyBuilder, TransitionPolicy};
//!
//! let policy: TransitionPolicy<String> = PolicyBuilder::new()
//!     .require_reason_for("rejected".to_string())
//!     .require_actor()
//!     .build();
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::PolicyBuilder;
pub use context::TransitionContext;
pub use rules::TransitionPolicy;
pub use violations::PolicyViolation;
