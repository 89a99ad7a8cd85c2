//! In-memory repository.

use super::{PersistenceError, Repository, RepositoryEnv};
use crate::checkpoint::{Checkpoint, CheckpointError};
use crate::core::{EntityId, State, StatefulEntity};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Thread-safe repository keeping entities in memory.
///
/// Clones share the same storage, so one instance can be handed to every
/// request of an application context.
pub struct InMemoryRepository<S: State> {
    entities: Arc<RwLock<HashMap<EntityId, StatefulEntity<S>>>>,
}

impl<S: State> InMemoryRepository<S> {
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> Result<usize, PersistenceError> {
        let entities = self.entities.read().map_err(|_| poisoned())?;
        Ok(entities.len())
    }

    pub fn is_empty(&self) -> Result<bool, PersistenceError> {
        Ok(self.len()? == 0)
    }

    /// Capture every stored entity in a checkpoint.
    pub fn snapshot(&self) -> Result<Checkpoint<S>, PersistenceError> {
        let entities = self.entities.read().map_err(|_| poisoned())?;
        let mut entities: Vec<StatefulEntity<S>> = entities.values().cloned().collect();
        entities.sort_by_key(|entity| entity.created_at());
        Ok(Checkpoint::new(entities))
    }

    /// Build a repository holding exactly the entities of a checkpoint.
    pub fn restore(checkpoint: Checkpoint<S>) -> Result<Self, CheckpointError> {
        checkpoint.validate()?;
        let entities = checkpoint
            .entities
            .into_iter()
            .map(|entity| (entity.id(), entity))
            .collect();
        Ok(Self {
            entities: Arc::new(RwLock::new(entities)),
        })
    }
}

fn poisoned() -> PersistenceError {
    PersistenceError::Unavailable("entity store lock poisoned".to_string())
}

impl<S: State> Default for InMemoryRepository<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Clone for InMemoryRepository<S> {
    fn clone(&self) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
        }
    }
}

impl<S: State> Repository<S> for InMemoryRepository<S> {
    fn find(&self, id: &EntityId) -> Result<Option<StatefulEntity<S>>, PersistenceError> {
        let entities = self.entities.read().map_err(|_| poisoned())?;
        Ok(entities.get(id).cloned())
    }

    fn insert(&self, entity: StatefulEntity<S>) -> Result<StatefulEntity<S>, PersistenceError> {
        let mut entities = self.entities.write().map_err(|_| poisoned())?;
        let id = entity.id();
        if entities.contains_key(&id) {
            return Err(PersistenceError::AlreadyExists { id });
        }
        entities.insert(id, entity.clone());
        debug!(entity_id = %id, "Inserted entity");
        Ok(entity)
    }

    fn save(
        &self,
        entity: StatefulEntity<S>,
        expected_version: u64,
    ) -> Result<StatefulEntity<S>, PersistenceError> {
        let mut entities = self.entities.write().map_err(|_| poisoned())?;
        let id = entity.id();
        let stored = entities
            .get(&id)
            .ok_or(PersistenceError::Missing { id })?;

        if stored.version() != expected_version {
            return Err(PersistenceError::VersionConflict {
                id,
                expected: expected_version,
                found: stored.version(),
            });
        }

        entities.insert(id, entity.clone());
        Ok(entity)
    }
}

impl<S: State> RepositoryEnv<S> for InMemoryRepository<S> {
    type Repo = Self;

    fn repository(&self) -> &Self::Repo {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MachineDefinition, TransitionDetails};

    fn definition() -> MachineDefinition<String> {
        MachineDefinition::builder()
            .states(["pending", "shipped"].map(String::from))
            .initial("pending".to_string())
            .allow("pending".to_string(), ["shipped".to_string()])
            .build()
            .unwrap()
    }

    #[test]
    fn insert_then_find() {
        let repo = InMemoryRepository::new();
        let entity = StatefulEntity::new(&definition());
        let id = entity.id();

        repo.insert(entity.clone()).unwrap();

        assert_eq!(repo.find(&id).unwrap(), Some(entity));
        assert_eq!(repo.len().unwrap(), 1);
    }

    #[test]
    fn find_missing_returns_none() {
        let repo: InMemoryRepository<String> = InMemoryRepository::new();
        assert_eq!(repo.find(&EntityId::new()).unwrap(), None);
        assert!(repo.is_empty().unwrap());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let repo = InMemoryRepository::new();
        let entity = StatefulEntity::new(&definition());
        let id = entity.id();

        repo.insert(entity.clone()).unwrap();
        assert_eq!(
            repo.insert(entity),
            Err(PersistenceError::AlreadyExists { id })
        );
    }

    #[test]
    fn save_with_stale_version_conflicts() {
        let repo = InMemoryRepository::new();
        let entity = repo.insert(StatefulEntity::new(&definition())).unwrap();
        let id = entity.id();

        let shipped = entity
            .clone()
            .apply_transition("shipped".to_string(), TransitionDetails::default());
        repo.save(shipped.clone(), 0).unwrap();

        let result = repo.save(shipped, 0);
        assert_eq!(
            result,
            Err(PersistenceError::VersionConflict {
                id,
                expected: 0,
                found: 1,
            })
        );
        assert_eq!(repo.find(&id).unwrap().unwrap().version(), 1);
    }

    #[test]
    fn save_unknown_entity_fails() {
        let repo = InMemoryRepository::new();
        let entity = StatefulEntity::new(&definition());
        let id = entity.id();

        assert_eq!(repo.save(entity, 0), Err(PersistenceError::Missing { id }));
    }

    #[test]
    fn clones_share_storage() {
        let repo = InMemoryRepository::new();
        let handle = repo.clone();
        let entity = StatefulEntity::new(&definition());
        let id = entity.id();

        handle.insert(entity).unwrap();
        assert!(repo.find(&id).unwrap().is_some());
    }

    #[test]
    fn snapshot_and_restore_round_trip() {
        let repo = InMemoryRepository::new();
        let first = repo.insert(StatefulEntity::new(&definition())).unwrap();
        repo.insert(StatefulEntity::new(&definition())).unwrap();

        let checkpoint = repo.snapshot().unwrap();
        assert_eq!(checkpoint.entities.len(), 2);

        let restored = InMemoryRepository::restore(checkpoint).unwrap();
        assert_eq!(restored.len().unwrap(), 2);
        assert_eq!(restored.find(&first.id()).unwrap(), Some(first));
    }
}
