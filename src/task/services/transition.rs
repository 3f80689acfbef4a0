//! Status transition orchestration.

use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

use crate::notification::ports::NotificationStore;
use crate::notification::services::NotificationDispatcher;
use crate::task::domain::{AuthorizationError, Task, TaskId, TaskStatus, UserId};
use crate::task::ports::{TaskStore, TaskStoreError};

/// Service-level errors for status transitions.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The actor may not change this task's status.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),
    /// Persistence failed; the transition was not saved.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Applies policy-gated status transitions against the backing store.
#[derive(Clone)]
pub struct StatusTransitionService<S, N, C>
where
    S: TaskStore,
    N: NotificationStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    dispatcher: NotificationDispatcher<N, C>,
    clock: Arc<C>,
}

impl<S, N, C> StatusTransitionService<S, N, C>
where
    S: TaskStore,
    N: NotificationStore,
    C: Clock + Send + Sync,
{
    /// Creates a new transition service.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        dispatcher: NotificationDispatcher<N, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            clock,
        }
    }

    /// Moves a task to `to` on behalf of `actor`.
    ///
    /// A same-status request is a no-op: nothing is persisted and no
    /// notification is emitted. Notification delivery is best-effort; a
    /// dispatch failure is logged but does not undo a persisted
    /// transition.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the task is missing, the policy
    /// denies the actor, or persistence fails.
    pub async fn change_status(
        &self,
        task_id: TaskId,
        to: TaskStatus,
        actor: UserId,
    ) -> Result<Task, TransitionError> {
        let mut task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or(TransitionError::UnknownTask(task_id))?;

        let Some(event) = task.change_status(to, actor, &*self.clock)? else {
            tracing::debug!(task = %task_id, status = to.as_str(), "same-status transition ignored");
            return Ok(task);
        };

        self.store.update(&task).await?;
        if let Err(err) = self.dispatcher.dispatch(&event, &task).await {
            tracing::warn!(task = %task_id, error = %err, "notification dispatch failed");
        }
        Ok(task)
    }
}
