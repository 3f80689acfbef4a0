//! Persistence port for tasks, assignments, and the effort ledger.

use crate::task::domain::{EffortLogEntry, Task, TaskId, TaskStatus, TeamId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Criteria for listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to a team.
    pub team: Option<TeamId>,
    /// Restrict to tasks where the user holds any assignment or is the
    /// creator.
    pub involving: Option<UserId>,
    /// Restrict to a status.
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    /// Matches every task.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            team: None,
            involving: None,
            status: None,
        }
    }

    /// Restricts the filter to one team.
    #[must_use]
    pub const fn for_team(team: TeamId) -> Self {
        Self {
            team: Some(team),
            involving: None,
            status: None,
        }
    }

    /// True when `task` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.team.is_none_or(|team| task.team() == team)
            && self.involving.is_none_or(|user| {
                task.creator() == user || task.assignment_for(user).is_some()
            })
            && self.status.is_none_or(|status| task.status() == status)
    }
}

/// Task persistence contract.
///
/// Every call may fail with a transport or domain error; callers treat any
/// non-success on a mutation as a rollback trigger and never retry
/// automatically.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Lists tasks matching `filter`.
    async fn list(&self, filter: &TaskFilter) -> TaskStoreResult<Vec<Task>>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the identifier
    /// already exists.
    async fn store(&self, task: &Task) -> TaskStoreResult<()>;

    /// Persists changes to an existing task (status, metadata,
    /// assignments).
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskStoreResult<()>;

    /// Deletes a task together with its assignments and effort ledger.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskStoreResult<()>;

    /// Appends a validated effort entry and returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist,
    /// or [`TaskStoreError::Rejected`] when the aggregate refuses the
    /// entry.
    async fn log_effort(&self, id: TaskId, entry: EffortLogEntry) -> TaskStoreResult<Task>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found; callers refresh from the source of truth.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The aggregate rejected the mutation.
    #[error("store rejected mutation: {0}")]
    Rejected(String),

    /// Transport-layer failure; the change was not saved.
    #[error("persistence error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
