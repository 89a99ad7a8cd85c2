//! Executor that applies validated transitions to stored entities.

use crate::core::{check_transition, EntityId, MachineDefinition, State, StatefulEntity};
use crate::effects::error::TransitionError;
use crate::effects::request::{BulkOutcome, BulkRequest, TransitionRequest};
use crate::persistence::{PersistenceError, Repository, RepositoryEnv};
use crate::policy::{TransitionContext, TransitionPolicy};
use chrono::Utc;
use std::sync::Arc;
use stillwater::effect::Effect;
use stillwater::prelude::*;
use tracing::{debug, info, warn};

/// Applies transitions from one machine definition.
///
/// An executor is an ordinary value: build one per lifecycle and hand it to
/// whatever needs it. Cloning is cheap and shares the definition.
pub struct TransitionExecutor<S: State> {
    definition: Arc<MachineDefinition<S>>,
    policy: Option<Arc<TransitionPolicy<S>>>,
}

impl<S: State> Clone for TransitionExecutor<S> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            policy: self.policy.as_ref().map(Arc::clone),
        }
    }
}

impl<S: State + 'static> TransitionExecutor<S> {
    pub fn new(definition: MachineDefinition<S>) -> Self {
        Self {
            definition: Arc::new(definition),
            policy: None,
        }
    }

    /// Check `policy` on every transition after the table check.
    pub fn with_policy(mut self, policy: TransitionPolicy<S>) -> Self {
        self.policy = Some(Arc::new(policy));
        self
    }

    pub fn definition(&self) -> &MachineDefinition<S> {
        &self.definition
    }

    /// Create and store a new entity in the initial status.
    pub fn create<R>(&self, repo: &R) -> Result<StatefulEntity<S>, TransitionError>
    where
        R: Repository<S> + ?Sized,
    {
        let entity = repo.insert(StatefulEntity::new(&self.definition))?;
        info!(
            entity_id = %entity.id(),
            status = entity.status().name(),
            "Created entity"
        );
        Ok(entity)
    }

    /// Load, validate, apply and save one transition.
    ///
    /// Either the entity is fully transitioned (status, history and version)
    /// and written once, or nothing is written at all.
    pub fn execute<R>(
        &self,
        repo: &R,
        request: TransitionRequest<S>,
    ) -> Result<StatefulEntity<S>, TransitionError>
    where
        R: Repository<S> + ?Sized,
    {
        let id = request.entity_id;
        debug!(entity_id = %id, to = request.target.name(), "Requesting status transition");

        let found = repo.find(&id).map_err(|err| {
            warn!(entity_id = %id, error = %err, "Failed to load entity for status transition");
            TransitionError::from(err)
        })?;
        let Some(entity) = found else {
            warn!(entity_id = %id, to = request.target.name(), "Transition requested for unknown entity");
            return Err(TransitionError::EntityNotFound { id });
        };

        let from = entity.status().clone();
        if let Err(rejection) = check_transition(&self.definition, &from, &request.target) {
            warn!(
                entity_id = %id,
                from = from.name(),
                to = request.target.name(),
                %rejection,
                "Rejected illegal status transition"
            );
            return Err(TransitionError::IllegalTransition {
                id,
                from: from.name().to_string(),
                to: request.target.name().to_string(),
                rejection,
            });
        }

        if let Some(policy) = &self.policy {
            let context = TransitionContext {
                entity_id: id,
                from: from.clone(),
                to: request.target.clone(),
                reason: request.reason.clone(),
                actor: request.actor.clone(),
                requested_at: Utc::now(),
            };
            let violations = policy.violations(&context);
            if !violations.is_empty() {
                warn!(
                    entity_id = %id,
                    from = from.name(),
                    to = request.target.name(),
                    violations = violations.len(),
                    "Rejected status transition by policy"
                );
                return Err(TransitionError::PolicyRejected {
                    id,
                    from: from.name().to_string(),
                    to: request.target.name().to_string(),
                    violations,
                });
            }
        }

        let expected_version = entity.version();
        let (target, details) = request.into_details();
        let updated = entity.apply_transition(target, details);

        match repo.save(updated, expected_version) {
            Ok(saved) => {
                info!(
                    entity_id = %id,
                    from = from.name(),
                    to = saved.status().name(),
                    version = saved.version(),
                    "Status transition applied"
                );
                Ok(saved)
            }
            Err(PersistenceError::VersionConflict {
                expected, found, ..
            }) => {
                warn!(
                    entity_id = %id,
                    expected,
                    found,
                    "Concurrent modification, transition not applied"
                );
                Err(TransitionError::Conflict {
                    id,
                    expected,
                    found,
                })
            }
            Err(PersistenceError::Missing { .. }) => {
                warn!(entity_id = %id, "Entity disappeared before save");
                Err(TransitionError::EntityNotFound { id })
            }
            Err(err) => {
                warn!(entity_id = %id, error = %err, "Failed to persist status transition");
                Err(err.into())
            }
        }
    }

    /// Apply the same transition to several entities independently.
    ///
    /// One entity failing never stops or affects the others.
    pub fn execute_bulk<R, I>(&self, repo: &R, ids: I, request: &BulkRequest<S>) -> BulkOutcome<S>
    where
        R: Repository<S> + ?Sized,
        I: IntoIterator<Item = EntityId>,
    {
        let mut outcome = BulkOutcome {
            succeeded: Vec::new(),
            failed: Vec::new(),
        };

        for id in ids {
            match self.execute(repo, request.for_entity(id)) {
                Ok(entity) => outcome.succeeded.push(entity),
                Err(err) => outcome.failed.push((id, err)),
            }
        }

        info!(
            to = request.target.name(),
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Bulk status transition finished"
        );
        outcome
    }

    /// Statuses a stored entity may move to next.
    pub fn available_for<R>(&self, repo: &R, id: &EntityId) -> Result<Vec<S>, TransitionError>
    where
        R: Repository<S> + ?Sized,
    {
        let entity = repo
            .find(id)?
            .ok_or(TransitionError::EntityNotFound { id: *id })?;
        Ok(self.definition.successors(entity.status()).to_vec())
    }

    /// Request a transition as an effect over a repository environment.
    ///
    /// Running the effect performs [`execute`](Self::execute) against the
    /// environment's repository.
    pub fn request_transition<Env>(
        &self,
        entity_id: EntityId,
        target: S,
        reason: Option<String>,
    ) -> impl Effect<Output = StatefulEntity<S>, Error = TransitionError, Env = Env>
    where
        Env: RepositoryEnv<S> + Clone + Send + Sync + 'static,
    {
        let mut request = TransitionRequest::new(entity_id, target);
        request.reason = reason;
        self.submit(request)
    }

    /// Like [`request_transition`](Self::request_transition) for a fully
    /// specified request.
    pub fn submit<Env>(
        &self,
        request: TransitionRequest<S>,
    ) -> impl Effect<Output = StatefulEntity<S>, Error = TransitionError, Env = Env>
    where
        Env: RepositoryEnv<S> + Clone + Send + Sync + 'static,
    {
        let executor = self.clone();
        from_fn(move |env: &Env| executor.execute(env.repository(), request.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rejection, ShipmentDetails};
    use crate::persistence::InMemoryRepository;
    use crate::policy::{PolicyBuilder, PolicyViolation};
    use crate::state_enum;

    state_enum! {
        enum ReviewState {
            Submitted => "submitted",
            Approved => "approved",
            Rejected => "rejected",
        }
    }

    fn definition() -> MachineDefinition<ReviewState> {
        MachineDefinition::builder()
            .states([ReviewState::Submitted, ReviewState::Approved, ReviewState::Rejected])
            .initial(ReviewState::Submitted)
            .allow(
                ReviewState::Submitted,
                [ReviewState::Approved, ReviewState::Rejected],
            )
            .build()
            .unwrap()
    }

    #[derive(Clone)]
    struct AppContext {
        repo: InMemoryRepository<ReviewState>,
    }

    impl RepositoryEnv<ReviewState> for AppContext {
        type Repo = InMemoryRepository<ReviewState>;

        fn repository(&self) -> &Self::Repo {
            &self.repo
        }
    }

    /// Repository whose store is always down.
    struct UnavailableRepository;

    impl Repository<ReviewState> for UnavailableRepository {
        fn find(
            &self,
            _id: &EntityId,
        ) -> Result<Option<StatefulEntity<ReviewState>>, PersistenceError> {
            Err(PersistenceError::Unavailable("connection refused".to_string()))
        }

        fn insert(
            &self,
            _entity: StatefulEntity<ReviewState>,
        ) -> Result<StatefulEntity<ReviewState>, PersistenceError> {
            Err(PersistenceError::Unavailable("connection refused".to_string()))
        }

        fn save(
            &self,
            _entity: StatefulEntity<ReviewState>,
            _expected_version: u64,
        ) -> Result<StatefulEntity<ReviewState>, PersistenceError> {
            Err(PersistenceError::Unavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn create_stores_entity_at_initial_state() {
        let executor = TransitionExecutor::new(definition());
        let repo = InMemoryRepository::new();

        let entity = executor.create(&repo).unwrap();

        assert_eq!(entity.status(), &ReviewState::Submitted);
        assert_eq!(repo.find(&entity.id()).unwrap(), Some(entity));
    }

    #[test]
    fn legal_transition_is_applied_and_saved() {
        let executor = TransitionExecutor::new(definition());
        let repo = InMemoryRepository::new();
        let entity = executor.create(&repo).unwrap();

        let request = TransitionRequest::new(entity.id(), ReviewState::Approved)
            .reason("documents verified")
            .actor("admin-3")
            .notes("fast track");
        let updated = executor.execute(&repo, request).unwrap();

        assert_eq!(updated.status(), &ReviewState::Approved);
        assert_eq!(updated.version(), 1);
        let record = updated.status_history().last().unwrap();
        assert_eq!(record.from, ReviewState::Submitted);
        assert_eq!(record.to, ReviewState::Approved);
        assert_eq!(record.actor.as_deref(), Some("admin-3"));
        assert_eq!(record.notes.as_deref(), Some("fast track"));
        assert_eq!(repo.find(&entity.id()).unwrap(), Some(updated));
    }

    #[test]
    fn unknown_entity_is_not_found() {
        let executor = TransitionExecutor::new(definition());
        let repo = InMemoryRepository::new();
        let id = EntityId::new();

        let result = executor.execute(&repo, TransitionRequest::new(id, ReviewState::Approved));

        assert_eq!(result, Err(TransitionError::EntityNotFound { id }));
    }

    #[test]
    fn terminal_state_rejects_without_writing() {
        let executor = TransitionExecutor::new(definition());
        let repo = InMemoryRepository::new();
        let entity = executor.create(&repo).unwrap();
        let approved = executor
            .execute(&repo, TransitionRequest::new(entity.id(), ReviewState::Approved))
            .unwrap();

        let result = executor.execute(
            &repo,
            TransitionRequest::new(entity.id(), ReviewState::Rejected),
        );

        assert_eq!(
            result,
            Err(TransitionError::IllegalTransition {
                id: entity.id(),
                from: "approved".to_string(),
                to: "rejected".to_string(),
                rejection: Rejection::Terminal {
                    state: "approved".to_string()
                },
            })
        );
        assert_eq!(repo.find(&entity.id()).unwrap(), Some(approved));
    }

    #[test]
    fn policy_violations_block_transition() {
        let executor = TransitionExecutor::new(definition()).with_policy(
            PolicyBuilder::new()
                .require_reason_for(ReviewState::Rejected)
                .require_actor()
                .build(),
        );
        let repo = InMemoryRepository::new();
        let entity = executor.create(&repo).unwrap();

        let result = executor.execute(
            &repo,
            TransitionRequest::new(entity.id(), ReviewState::Rejected),
        );

        match result {
            Err(TransitionError::PolicyRejected { violations, .. }) => {
                assert_eq!(violations.len(), 2);
                assert!(violations.contains(&PolicyViolation::ActorRequired));
            }
            other => panic!("Expected policy rejection, got {:?}", other),
        }
        assert_eq!(repo.find(&entity.id()).unwrap(), Some(entity.clone()));

        let accepted = executor
            .execute(
                &repo,
                TransitionRequest::new(entity.id(), ReviewState::Rejected)
                    .reason("missing licence")
                    .actor("admin-1"),
            )
            .unwrap();
        assert_eq!(accepted.status(), &ReviewState::Rejected);
    }

    #[test]
    fn persistence_failure_is_propagated() {
        let executor = TransitionExecutor::new(definition());
        let result = executor.execute(
            &UnavailableRepository,
            TransitionRequest::new(EntityId::new(), ReviewState::Approved),
        );

        assert_eq!(
            result,
            Err(TransitionError::Persistence(PersistenceError::Unavailable(
                "connection refused".to_string()
            )))
        );
    }

    #[test]
    fn bulk_reports_each_entity() {
        let executor = TransitionExecutor::new(definition());
        let repo = InMemoryRepository::new();
        let first = executor.create(&repo).unwrap();
        let second = executor.create(&repo).unwrap();
        executor
            .execute(&repo, TransitionRequest::new(second.id(), ReviewState::Rejected))
            .unwrap();
        let missing = EntityId::new();

        let outcome = executor.execute_bulk(
            &repo,
            [first.id(), second.id(), missing],
            &BulkRequest::new(ReviewState::Approved).reason("Bulk status update"),
        );

        assert_eq!(outcome.total(), 3);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.succeeded.len(), 1);
        assert_eq!(outcome.succeeded[0].id(), first.id());
        assert_eq!(
            outcome.succeeded[0].status_history().last().unwrap().reason.as_deref(),
            Some("Bulk status update")
        );
        assert_eq!(outcome.failed.len(), 2);
        assert!(outcome
            .failed
            .iter()
            .any(|(id, err)| *id == missing && matches!(err, TransitionError::EntityNotFound { .. })));
        assert!(outcome
            .failed
            .iter()
            .any(|(id, err)| *id == second.id() && err.is_rejection()));
    }

    #[test]
    fn bulk_carries_actor_and_notes_into_each_record() {
        let executor = TransitionExecutor::new(definition())
            .with_policy(PolicyBuilder::new().require_actor().build());
        let repo = InMemoryRepository::new();
        let ids = [
            executor.create(&repo).unwrap().id(),
            executor.create(&repo).unwrap().id(),
        ];

        let unattributed =
            executor.execute_bulk(&repo, ids, &BulkRequest::new(ReviewState::Approved));
        assert!(unattributed.succeeded.is_empty());
        assert_eq!(unattributed.failed.len(), 2);

        let outcome = executor.execute_bulk(
            &repo,
            ids,
            &BulkRequest::new(ReviewState::Approved)
                .actor("admin-4")
                .notes("quarterly review"),
        );

        assert!(outcome.is_complete());
        for entity in &outcome.succeeded {
            let record = entity.status_history().last().unwrap();
            assert_eq!(record.actor.as_deref(), Some("admin-4"));
            assert_eq!(record.notes.as_deref(), Some("quarterly review"));
        }
    }

    #[test]
    fn shipment_details_are_recorded() {
        let executor = TransitionExecutor::new(definition());
        let repo = InMemoryRepository::new();
        let entity = executor.create(&repo).unwrap();

        let updated = executor
            .execute(
                &repo,
                TransitionRequest::new(entity.id(), ReviewState::Approved)
                    .shipment(ShipmentDetails::new("TRK-0042")),
            )
            .unwrap();

        let record = updated.status_history().last().unwrap();
        assert_eq!(
            record.shipment.as_ref().map(|s| s.tracking_number.as_str()),
            Some("TRK-0042")
        );
    }

    #[test]
    fn available_for_lists_successors() {
        let executor = TransitionExecutor::new(definition());
        let repo = InMemoryRepository::new();
        let entity = executor.create(&repo).unwrap();

        assert_eq!(
            executor.available_for(&repo, &entity.id()).unwrap(),
            vec![ReviewState::Approved, ReviewState::Rejected]
        );
        assert!(matches!(
            executor.available_for(&repo, &EntityId::new()),
            Err(TransitionError::EntityNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn request_transition_runs_against_environment() {
        let executor = TransitionExecutor::new(definition());
        let env = AppContext {
            repo: InMemoryRepository::new(),
        };
        let entity = executor.create(&env.repo).unwrap();

        let updated = executor
            .request_transition::<AppContext>(entity.id(), ReviewState::Approved, None)
            .run(&env)
            .await
            .unwrap();

        assert_eq!(updated.status(), &ReviewState::Approved);
        assert_eq!(updated.status_history().len(), 1);
    }

    #[tokio::test]
    async fn rejected_effect_returns_error() {
        let executor = TransitionExecutor::new(definition());
        let repo = InMemoryRepository::new();
        let entity = executor.create(&repo).unwrap();

        let result = executor
            .request_transition::<InMemoryRepository<ReviewState>>(
                entity.id(),
                ReviewState::Submitted,
                Some("again".to_string()),
            )
            .run(&repo)
            .await;

        assert!(matches!(
            result,
            Err(TransitionError::IllegalTransition {
                rejection: Rejection::NotAllowed,
                ..
            })
        ));
        assert_eq!(repo.find(&entity.id()).unwrap(), Some(entity));
    }
}
