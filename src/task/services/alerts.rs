//! Role-scoped deadline alert reports.
//!
//! Managers see every deadline bucket for their team, including tasks
//! past their scheduled start that nobody has begun. Employees see the
//! same buckets restricted to tasks they are involved in, without the
//! unstarted bucket, which is a supervision concern.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::task::domain::{DeadlineReport, UserId};
use crate::task::ports::{
    IdentityDirectory, IdentityError, TaskFilter, TaskStore, TaskStoreError, UserRole,
};

/// Errors raised while assembling a deadline report.
#[derive(Debug, Error)]
pub enum AlertError {
    /// The requesting user could not be resolved.
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// The requesting user is unknown to the directory.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),
    /// The task list could not be read.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Builds deadline reports scoped to the requesting user's role and team.
pub struct DeadlineAlertService<S, I>
where
    S: TaskStore,
    I: IdentityDirectory,
{
    store: Arc<S>,
    directory: Arc<I>,
}

impl<S, I> DeadlineAlertService<S, I>
where
    S: TaskStore,
    I: IdentityDirectory,
{
    /// Creates an alert service over its collaborators.
    #[must_use]
    pub const fn new(store: Arc<S>, directory: Arc<I>) -> Self {
        Self { store, directory }
    }

    /// Assembles the deadline report for `user` relative to `now`.
    ///
    /// Managers get their whole team's tasks; employees only tasks they
    /// created or hold an assignment on, and never the unstarted bucket.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::UnknownUser`] for unresolvable users and
    /// [`AlertError::Store`] when the task list cannot be read.
    pub async fn report_for(
        &self,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<DeadlineReport, AlertError> {
        let principal = self
            .directory
            .resolve(user)
            .await?
            .ok_or(AlertError::UnknownUser(user))?;
        let filter = match principal.role {
            UserRole::Manager => TaskFilter::for_team(principal.team),
            UserRole::Employee => TaskFilter {
                team: Some(principal.team),
                involving: Some(user),
                status: None,
            },
        };
        let tasks = self.store.list(&filter).await?;
        let mut report = DeadlineReport::build(&tasks, now);
        if principal.role == UserRole::Employee {
            report.unstarted.clear();
        }
        Ok(report)
    }
}
