//! Effort ledger orchestration.

use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

use crate::notification::ports::NotificationStore;
use crate::notification::services::NotificationDispatcher;
use crate::task::domain::{
    AuthorizationError, EffortLogEntry, Labor, Task, TaskAction, TaskDomainError, TaskEvent,
    TaskId, UserId, policy,
};
use crate::task::ports::{TaskStore, TaskStoreError};

/// Service-level errors for effort logging.
#[derive(Debug, Error)]
pub enum EffortLogError {
    /// The submitted entry failed validation (e.g. zero labor).
    #[error(transparent)]
    Validation(#[from] TaskDomainError),
    /// The actor holds no assignment on the task.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),
    /// Persistence failed; the entry was not appended.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Outcome of a successful effort log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffortReceipt {
    /// Task state after the append.
    pub task: Task,
    /// New cumulative labor total for the actor's assignment.
    pub total: Labor,
    /// Timestamp of the appended entry.
    pub logged_at: DateTime<Utc>,
}

/// Appends validated effort entries and emits `effort-logged` events.
///
/// The ledger is append-only: entries are never edited or deleted, and
/// corrections are made by logging further compensating entries. An
/// assignment's `actual_labor` therefore stays a pure fold over its
/// entries. Failed appends are never retried here.
#[derive(Clone)]
pub struct EffortLedgerService<S, N, C>
where
    S: TaskStore,
    N: NotificationStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    dispatcher: NotificationDispatcher<N, C>,
    clock: Arc<C>,
}

impl<S, N, C> EffortLedgerService<S, N, C>
where
    S: TaskStore,
    N: NotificationStore,
    C: Clock + Send + Sync,
{
    /// Creates a new ledger service.
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

    /// Logs `labor` against `task_id` on behalf of `actor`.
    ///
    /// Requires any assignment (assignee or partner) on the task; the
    /// policy is checked before any collaborator call. Notification
    /// delivery is best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`EffortLogError::Validation`] for zero labor,
    /// [`EffortLogError::Authorization`] for actors without an
    /// assignment, and [`EffortLogError::Store`] when persistence fails.
    pub async fn log_effort(
        &self,
        task_id: TaskId,
        actor: UserId,
        labor: Labor,
        details: &str,
    ) -> Result<EffortReceipt, EffortLogError> {
        let task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or(EffortLogError::UnknownTask(task_id))?;
        if !policy::can_log_effort(&task, actor) {
            return Err(AuthorizationError {
                actor,
                action: TaskAction::LogEffort,
                task: task_id,
            }
            .into());
        }

        let entry = EffortLogEntry::new(task_id, actor, labor, details, &*self.clock)?;
        let logged_at = entry.logged_at();
        let updated = self.store.log_effort(task_id, entry).await?;
        let total = updated
            .assignment_for(actor)
            .map_or(labor, |a| a.actual_labor());

        let event = TaskEvent::EffortLogged {
            task: task_id,
            actor,
            labor,
            total,
            at: logged_at,
        };
        if let Err(err) = self.dispatcher.dispatch(&event, &updated).await {
            tracing::warn!(task = %task_id, error = %err, "notification dispatch failed");
        }

        Ok(EffortReceipt {
            task: updated,
            total,
            logged_at,
        })
    }
}
