//! Core State trait for lifecycle statuses.
//!
//! Every status a machine definition talks about implements this trait.
//! Statuses are plain values: they are compared, hashed and serialized,
//! never mutated.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for lifecycle statuses.
///
/// # Required Traits
///
/// - `Clone`: statuses are copied into history records
/// - `Eq` + `Hash`: statuses key the transition table
/// - `Debug`: statuses must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: statuses are persisted with their entity
///
/// `String` implements `State`, so a machine can be described entirely with
/// named string statuses. For typed statuses see [`state_enum!`](crate::state_enum).
///
/// # Example
///
/// ```rust
/// use statusflow::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum TicketStatus {
///     Open,
///     Resolved,
/// }
///
/// impl State for TicketStatus {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "open",
///             Self::Resolved => "resolved",
///         }
///     }
/// }
///
/// assert_eq!(TicketStatus::Resolved.name(), "resolved");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the status name for display, logging and error reporting.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
