//! Domain events emitted by successful task mutations.

use super::effort::Labor;
use super::ids::{TaskId, UserId};
use super::status::TaskStatus;
use super::task::AssignmentRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An internal signal consumed by the notification layer.
///
/// Events are only emitted after the mutation they describe has been
/// applied; a rejected or no-op mutation emits nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// A task moved between two distinct statuses.
    StatusChanged {
        /// Task that moved.
        task: TaskId,
        /// User who performed the move.
        actor: UserId,
        /// Status before the move.
        from: TaskStatus,
        /// Status after the move.
        to: TaskStatus,
        /// Time of the move.
        at: DateTime<Utc>,
    },
    /// An effort ledger entry was appended.
    EffortLogged {
        /// Task the effort was logged against.
        task: TaskId,
        /// User who logged the effort.
        actor: UserId,
        /// Labor in the appended entry.
        labor: Labor,
        /// New cumulative total for the actor's assignment.
        total: Labor,
        /// Time the entry was appended.
        at: DateTime<Utc>,
    },
    /// A user was bound to a task.
    TaskAssigned {
        /// Task the user was assigned to.
        task: TaskId,
        /// User who created the assignment.
        actor: UserId,
        /// Newly assigned user.
        assignee: UserId,
        /// Role of the new assignment.
        role: AssignmentRole,
        /// Time of the assignment.
        at: DateTime<Utc>,
    },
}

impl TaskEvent {
    /// Returns the task the event concerns.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        match self {
            Self::StatusChanged { task, .. }
            | Self::EffortLogged { task, .. }
            | Self::TaskAssigned { task, .. } => *task,
        }
    }

    /// Returns the user whose action produced the event.
    #[must_use]
    pub const fn actor(&self) -> UserId {
        match self {
            Self::StatusChanged { actor, .. }
            | Self::EffortLogged { actor, .. }
            | Self::TaskAssigned { actor, .. } => *actor,
        }
    }

    /// Returns the event timestamp.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        match self {
            Self::StatusChanged { at, .. }
            | Self::EffortLogged { at, .. }
            | Self::TaskAssigned { at, .. } => *at,
        }
    }
}
