//! Task creation, metadata editing, assignment, and cascade deletion.

use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

use crate::notification::ports::NotificationStore;
use crate::notification::services::NotificationDispatcher;
use crate::task::domain::{
    AssignmentRole, AuthorizationError, Labor, Priority, Task, TaskAction, TaskDomainError,
    TaskDraft, TaskEvent, TaskId, UserId, policy,
};
use crate::task::ports::{TaskStore, TaskStoreError};

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The actor may not perform the operation.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),
    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Partial update to a task's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    description: Option<String>,
    priority: Option<Priority>,
    schedule: Option<(DateTime<Utc>, DateTime<Utc>)>,
    planned_labor: Option<Labor>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            description: None,
            priority: None,
            schedule: None,
            planned_labor: None,
        }
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the scheduled dates.
    #[must_use]
    pub const fn with_schedule(mut self, start: DateTime<Utc>, completion: DateTime<Utc>) -> Self {
        self.schedule = Some((start, completion));
        self
    }

    /// Replaces the planned labor budget.
    #[must_use]
    pub const fn with_planned_labor(mut self, planned_labor: Labor) -> Self {
        self.planned_labor = Some(planned_labor);
        self
    }

    fn apply(self, task: &mut Task, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if let Some(description) = self.description {
            task.set_description(description, clock)?;
        }
        if let Some(priority) = self.priority {
            task.set_priority(priority, clock);
        }
        if let Some((start, completion)) = self.schedule {
            task.reschedule(start, completion, clock)?;
        }
        if let Some(planned) = self.planned_labor {
            task.set_planned_labor(planned, clock);
        }
        Ok(())
    }
}

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<S, N, C>
where
    S: TaskStore,
    N: NotificationStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    dispatcher: NotificationDispatcher<N, C>,
    clock: Arc<C>,
}

impl<S, N, C> TaskLifecycleService<S, N, C>
where
    S: TaskStore,
    N: NotificationStore,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
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

    /// Creates a task from a draft and notifies the initial assignees.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when validation fails or the store
    /// rejects persistence.
    pub async fn create(&self, draft: TaskDraft) -> Result<Task, TaskLifecycleError> {
        let task = Task::create(draft, &*self.clock)?;
        self.store.store(&task).await?;
        for assignment in task.assignments() {
            let event = TaskEvent::TaskAssigned {
                task: task.id(),
                actor: task.creator(),
                assignee: assignment.user(),
                role: assignment.role(),
                at: task.created_at(),
            };
            if let Err(err) = self.dispatcher.dispatch(&event, &task).await {
                tracing::warn!(task = %task.id(), error = %err, "notification dispatch failed");
            }
        }
        Ok(task)
    }

    /// Applies a metadata patch on behalf of `actor`. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Authorization`] for non-creators and
    /// [`TaskLifecycleError::Domain`] when the patch fails validation.
    pub async fn edit_details(
        &self,
        task_id: TaskId,
        patch: TaskPatch,
        actor: UserId,
    ) -> Result<Task, TaskLifecycleError> {
        let mut task = self.fetch(task_id).await?;
        Self::require(
            policy::can_edit_metadata(&task, actor),
            actor,
            TaskAction::EditMetadata,
            task_id,
        )?;
        patch.apply(&mut task, &*self.clock)?;
        self.store.update(&task).await?;
        Ok(task)
    }

    /// Binds `user` to the task on behalf of `actor`. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the user is already
    /// assigned and [`TaskLifecycleError::Authorization`] for
    /// non-creators.
    pub async fn assign(
        &self,
        task_id: TaskId,
        user: UserId,
        role: AssignmentRole,
        planned_labor: Labor,
        actor: UserId,
    ) -> Result<Task, TaskLifecycleError> {
        let mut task = self.fetch(task_id).await?;
        Self::require(
            policy::can_edit_metadata(&task, actor),
            actor,
            TaskAction::EditMetadata,
            task_id,
        )?;
        task.assign(user, role, planned_labor, &*self.clock)?;
        self.store.update(&task).await?;

        let event = TaskEvent::TaskAssigned {
            task: task_id,
            actor,
            assignee: user,
            role,
            at: task.updated_at(),
        };
        if let Err(err) = self.dispatcher.dispatch(&event, &task).await {
            tracing::warn!(task = %task_id, error = %err, "notification dispatch failed");
        }
        Ok(task)
    }

    /// Deletes the task with all assignments, effort entries, and
    /// notifications. Creator only; no orphaned child records remain.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Authorization`] for non-creators and
    /// [`TaskLifecycleError::Store`] when deletion fails.
    pub async fn delete(&self, task_id: TaskId, actor: UserId) -> Result<(), TaskLifecycleError> {
        let task = self.fetch(task_id).await?;
        Self::require(
            policy::can_delete(&task, actor),
            actor,
            TaskAction::Delete,
            task_id,
        )?;
        self.store.delete(task_id).await?;
        if let Err(err) = self.dispatcher.purge_task(task_id).await {
            tracing::warn!(task = %task_id, error = %err, "notification cascade failed");
        }
        Ok(())
    }

    async fn fetch(&self, task_id: TaskId) -> Result<Task, TaskLifecycleError> {
        self.store
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::UnknownTask(task_id))
    }

    const fn require(
        allowed: bool,
        actor: UserId,
        action: TaskAction,
        task: TaskId,
    ) -> Result<(), AuthorizationError> {
        if allowed {
            Ok(())
        } else {
            Err(AuthorizationError {
                actor,
                action,
                task,
            })
        }
    }
}
