//! Effectful transition execution.
//!
//! This module is the "imperative shell" around the pure core: it loads
//! entities, asks the core whether a move is legal, and writes the result
//! back through a repository.
//!
//! # Key Concepts
//!
//! - **Executor**: applies transitions of one machine definition
//! - **Requests**: target status plus optional reason, actor and notes
//! - **Effects**: `request_transition` returns a Stillwater effect run
//!   against any environment that provides a repository

mod error;
mod executor;
mod request;

pub use error::TransitionError;
pub use executor::TransitionExecutor;
pub use request::{BulkOutcome, BulkRequest, TransitionRequest};
