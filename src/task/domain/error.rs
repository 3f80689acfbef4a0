//! Error types for task domain validation and authorization.

use super::ids::{TaskId, UserId};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The completion date falls before the start date.
    #[error("completion date {completion} is before start date {start}")]
    CompletionBeforeStart {
        /// Scheduled start date (calendar date).
        start: chrono::NaiveDate,
        /// Scheduled completion date (calendar date).
        completion: chrono::NaiveDate,
    },

    /// The user already holds an assignment on the task.
    #[error("user {user} is already assigned to task {task}")]
    DuplicateAssignment {
        /// Task the assignment was attempted on.
        task: TaskId,
        /// User already present in the assignment list.
        user: UserId,
    },

    /// An effort entry was submitted with zero labor.
    #[error("logged effort must be greater than zero minutes")]
    EmptyEffort,

    /// The actor holds no assignment on the task.
    #[error("user {user} holds no assignment on task {task}")]
    NotAssigned {
        /// Task the effort was logged against.
        task: TaskId,
        /// User without an assignment.
        user: UserId,
    },
}

/// Actions gated by the authorization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Editing task metadata (description, dates, priority, planned labor).
    EditMetadata,
    /// Deleting the task and all child records.
    Delete,
    /// Moving the task to a different status.
    ChangeStatus,
    /// Appending an entry to the effort ledger.
    LogEffort,
}

impl TaskAction {
    /// Returns a short human-readable action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EditMetadata => "edit metadata",
            Self::Delete => "delete",
            Self::ChangeStatus => "change status",
            Self::LogEffort => "log effort",
        }
    }
}

/// Error raised when the authorization policy denies an action.
///
/// Raised before any mutation or collaborator call is attempted, so a
/// denied action never leaves partial state behind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("user {actor} is not allowed to {} task {task}", action.as_str())]
pub struct AuthorizationError {
    /// Actor whose request was denied.
    pub actor: UserId,
    /// Action that was denied.
    pub action: TaskAction,
    /// Task the action targeted.
    pub task: TaskId,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseStatusError(pub String);
