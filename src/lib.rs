//! Statusflow: table-driven status transitions for entity lifecycles
//!
//! Orders, fulfillments, applications and enrollments all move through a
//! fixed set of statuses. Statusflow keeps that logic in one place: a
//! validated transition table, a pure legality check, an append-only status
//! history, and an executor that loads an entity, applies a legal
//! transition and writes it back with an optimistic version check.
//!
//! # Core Concepts
//!
//! - **State**: any status type implementing the `State` trait
//! - **MachineDefinition**: statuses, the initial status and allowed moves
//! - **StatusHistory**: immutable record of accepted transitions
//! - **TransitionExecutor**: applies requests through a `Repository`
//! - **TransitionPolicy**: domain preconditions such as "rejections need a reason"
//!
//! # Example
//!
//! ```rust
//! use statusflow::effects::{TransitionError, TransitionExecutor, TransitionRequest};
//! use statusflow::persistence::InMemoryRepository;
//! use statusflow::presets::{self, FulfillmentStatus};
//!
//! let executor = TransitionExecutor::new(presets::fulfillment());
//! let repo = InMemoryRepository::new();
//! let entity = executor.create(&repo).unwrap();
//!
//! // Skipping a step is refused and nothing is written.
//! let skipped = executor.execute(
//!     &repo,
//!     TransitionRequest::new(entity.id(), FulfillmentStatus::OrderCreated),
//! );
//! assert!(matches!(skipped, Err(TransitionError::IllegalTransition { .. })));
//!
//! let entity = executor
//!     .execute(
//!         &repo,
//!         TransitionRequest::new(entity.id(), FulfillmentStatus::AddressCollected),
//!     )
//!     .unwrap();
//! assert_eq!(entity.status(), &FulfillmentStatus::AddressCollected);
//! assert_eq!(entity.status_history().len(), 1);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod effects;
pub mod persistence;
pub mod policy;
pub mod presets;

// Re-export commonly used types
pub use crate::core::{
    EntityId, MachineDefinition, State, StatefulEntity, StatusHistory, TransitionRecord,
};
pub use crate::effects::{BulkRequest, TransitionError, TransitionExecutor, TransitionRequest};
pub use crate::persistence::{InMemoryRepository, Repository};
