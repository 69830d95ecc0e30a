use std::fmt::{self, Debug};

use tracing::{debug, info, warn};

use crate::action::Action;
use crate::audit::SagaAuditLog;
use crate::erased::ErasedAction;
use crate::error::{CompensationError, SagaError};
use crate::instance::{ActionEntry, ActionHandle, ActionInstance};
use crate::options::CommitOptions;

/// An ordered pipeline of reversible actions.
///
/// Actions apply one at a time in registration order. If one fails, every
/// action that already applied is compensated in reverse order (LIFO) and the
/// failure is returned. A saga commits at most once; its actions stay
/// readable afterwards.
pub struct Saga<E> {
    registry: Vec<Box<dyn ErasedAction<E>>>,
    /// Positions of applied actions not yet rolled back, oldest first.
    completed: Vec<usize>,
    committed: bool,
}

impl<E> Saga<E>
where
    E: Debug + Send + 'static,
{
    /// Create an empty saga.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Vec::new(),
            completed: Vec::new(),
            committed: false,
        }
    }

    /// Register an action with its props, returning the saga for chaining.
    #[must_use]
    pub fn register<A>(mut self, action: A, props: A::Props) -> Self
    where
        A: Action<Error = E>,
    {
        self.add(action, props);
        self
    }

    /// Register an action with its props, returning a typed handle to it.
    ///
    /// Actions added after the saga was committed are kept in the registry but
    /// never run.
    pub fn add<A>(&mut self, action: A, props: A::Props) -> ActionHandle<A>
    where
        A: Action<Error = E>,
    {
        let position = self.registry.len();
        debug!(action = action.name(), position, ?props, "registered action");
        self.registry
            .push(Box::new(ActionInstance::new(action, props, position)));
        ActionHandle::new(position)
    }

    /// The instance behind a handle returned by [`Saga::add`].
    ///
    /// Returns `None` if the handle belongs to a different saga.
    #[must_use]
    pub fn get<A>(&self, handle: ActionHandle<A>) -> Option<&ActionInstance<A>>
    where
        A: Action<Error = E>,
    {
        self.instances().get_as(handle.position())
    }

    /// Read-only view of every registered action, in registration order.
    #[must_use]
    pub fn instances(&self) -> Instances<'_, E> {
        Instances {
            registry: &self.registry,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Positions of actions that applied and have not been rolled back, most
    /// recently applied first.
    pub fn completion_stack(&self) -> impl Iterator<Item = usize> + '_ {
        self.completed.iter().rev().copied()
    }

    /// Apply every action in order, compensating on failure.
    ///
    /// # Errors
    ///
    /// See [`Saga::commit_with`].
    pub async fn commit(&mut self) -> Result<Instances<'_, E>, SagaError<E>> {
        self.commit_with(CommitOptions::default()).await
    }

    /// Apply every action in order, compensating on failure or when
    /// [`CommitOptions::force_rollback`] asks for it.
    ///
    /// Returns the full registry for inspection.
    ///
    /// # Errors
    ///
    /// Returns `SagaError::ApplyFailed` carrying the original error if an apply
    /// fails and all compensations succeed.
    /// Returns `SagaError::CompensationFailed` if any compensation fails.
    /// Returns `SagaError::AlreadyCommitted` if the saga was committed before.
    pub async fn commit_with(
        &mut self,
        options: CommitOptions,
    ) -> Result<Instances<'_, E>, SagaError<E>> {
        let (result, _audit_log) = self.commit_with_audit(options).await;
        result
    }

    /// Commit the saga and return both the result and an audit log.
    ///
    /// The audit log tracks every apply and compensation.
    pub async fn commit_with_audit(
        &mut self,
        options: CommitOptions,
    ) -> (Result<Instances<'_, E>, SagaError<E>>, SagaAuditLog) {
        let mut audit_log = SagaAuditLog::new();

        if self.committed {
            warn!("saga was already committed, refusing to run it again");
            return (Err(SagaError::AlreadyCommitted), audit_log);
        }
        self.committed = true;

        info!(
            actions = self.registry.len(),
            force_rollback = options.force_rollback(),
            "committing saga"
        );

        if let Err(error) = self.apply_all(&mut audit_log).await {
            return (Err(error), audit_log);
        }

        if options.force_rollback() {
            info!(
                actions = self.completed.len(),
                "all actions applied, forcing rollback"
            );
            let compensation_errors = self.rollback(&mut audit_log).await;
            if !compensation_errors.is_empty() {
                return (
                    Err(SagaError::CompensationFailed {
                        failed_action: None,
                        apply_error: None,
                        compensation_errors,
                    }),
                    audit_log,
                );
            }
        }

        info!(actions = self.registry.len(), "saga committed");
        (Ok(self.instances()), audit_log)
    }

    async fn apply_all(&mut self, audit_log: &mut SagaAuditLog) -> Result<(), SagaError<E>> {
        for position in 0..self.registry.len() {
            let action = &mut self.registry[position];
            let name = action.name();
            audit_log.record_start(position, name);
            debug!(action = name, position, "applying action");

            let result = action.apply().await;
            match result {
                Ok(()) => {
                    action.mark_ran();
                    audit_log.record_success(position, action.compensation_description());
                    self.completed.push(position);
                }
                Err(error) => {
                    audit_log.record_failure(position);
                    warn!(
                        action = name,
                        position,
                        completed = self.completed.len(),
                        "action failed, rolling back"
                    );
                    let compensation_errors = self.rollback(audit_log).await;
                    return Err(if compensation_errors.is_empty() {
                        SagaError::ApplyFailed {
                            action: name.to_string(),
                            position,
                            source: error,
                        }
                    } else {
                        SagaError::CompensationFailed {
                            failed_action: Some(name.to_string()),
                            apply_error: Some(error),
                            compensation_errors,
                        }
                    });
                }
            }
        }
        Ok(())
    }

    /// Compensate every action on the completion stack, most recent first.
    ///
    /// A failed compensation is recorded and the pass continues. The stack is
    /// empty afterwards.
    async fn rollback(&mut self, audit_log: &mut SagaAuditLog) -> Vec<CompensationError<E>> {
        let mut compensation_errors = Vec::new();

        while let Some(position) = self.completed.pop() {
            let action = &mut self.registry[position];
            let name = action.name();
            let description = action.compensation_description();
            debug!(action = name, position, "compensating action");

            let result = action.compensate().await;
            match result {
                Ok(()) => {
                    action.mark_reverted();
                    audit_log.record_compensated(position);
                }
                Err(error) => {
                    warn!(action = name, position, ?error, "compensation failed");
                    audit_log.record_compensation_failed(position);
                    compensation_errors.push(CompensationError {
                        action: name.to_string(),
                        position,
                        description,
                        error,
                    });
                }
            }
        }

        compensation_errors
    }
}

impl<E> Default for Saga<E>
where
    E: Debug + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Debug for Saga<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Saga")
            .field("registry", &self.registry)
            .field("completed", &self.completed)
            .field("committed", &self.committed)
            .finish()
    }
}

/// Ordered, read-only view of a saga's registered actions.
pub struct Instances<'a, E> {
    registry: &'a [Box<dyn ErasedAction<E>>],
}

impl<'a, E> Instances<'a, E> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// The entry at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&'a dyn ActionEntry> {
        self.registry.get(position).map(|action| action.entry())
    }

    /// The entry at `position` as its concrete instance type.
    ///
    /// Returns `None` if the position is out of range or holds a different
    /// action type.
    #[must_use]
    pub fn get_as<A: Action>(&self, position: usize) -> Option<&'a ActionInstance<A>> {
        self.get(position)?
            .as_any()
            .downcast_ref::<ActionInstance<A>>()
    }

    /// Iterate over every entry in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'a dyn ActionEntry> + 'a {
        self.registry.iter().map(|action| action.entry())
    }
}

impl<E> Clone for Instances<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Instances<'_, E> {}

impl<E> Debug for Instances<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
