//! Persistence adapter for stateful entities.
//!
//! The executor only needs to load an entity and write it back whole. Any
//! store that can do that, and can refuse a write whose expected version is
//! stale, can back it.

mod error;
mod memory;

pub use error::PersistenceError;
pub use memory::InMemoryRepository;

use crate::core::{EntityId, State, StatefulEntity};

/// Storage for stateful entities.
///
/// Implementations must make `save` a single atomic write of the whole
/// entity, guarded by `expected_version`.
pub trait Repository<S: State>: Send + Sync {
    /// Load an entity; `Ok(None)` when it does not exist.
    fn find(&self, id: &EntityId) -> Result<Option<StatefulEntity<S>>, PersistenceError>;

    /// Store a new entity.
    fn insert(&self, entity: StatefulEntity<S>) -> Result<StatefulEntity<S>, PersistenceError>;

    /// Replace a stored entity if its stored version still equals
    /// `expected_version`; otherwise fail with
    /// [`PersistenceError::VersionConflict`] and leave the store unchanged.
    fn save(
        &self,
        entity: StatefulEntity<S>,
        expected_version: u64,
    ) -> Result<StatefulEntity<S>, PersistenceError>;
}

/// Environment capability: access to a repository.
///
/// Effects produced by
/// [`TransitionExecutor::request_transition`](crate::effects::TransitionExecutor::request_transition)
/// run against any environment implementing this trait.
pub trait RepositoryEnv<S: State> {
    type Repo: Repository<S>;

    fn repository(&self) -> &Self::Repo;
}
