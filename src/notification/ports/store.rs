//! Notification store collaborator port.

use crate::notification::domain::{Notification, NotificationId};
use crate::task::domain::{TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification store operations.
pub type NotificationStoreResult<T> = Result<T, NotificationStoreError>;

/// Notification persistence contract.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persists a new notification.
    async fn create(&self, notification: &Notification) -> NotificationStoreResult<()>;

    /// Marks a notification read. Idempotent: an already-read
    /// notification stays read and the call succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationStoreError::NotFound`] for an unknown
    /// identifier.
    async fn mark_read(&self, id: NotificationId) -> NotificationStoreResult<()>;

    /// Marks every unread notification for `receiver` read, atomically
    /// from the caller's perspective, and returns how many changed.
    async fn mark_all_read(&self, receiver: UserId) -> NotificationStoreResult<usize>;

    /// Lists the receiver's notifications, newest first.
    async fn list(&self, receiver: UserId) -> NotificationStoreResult<Vec<Notification>>;

    /// Counts the receiver's unread notifications.
    async fn unread_count(&self, receiver: UserId) -> NotificationStoreResult<usize>;

    /// Removes every notification referencing `task` (cascade delete
    /// hook).
    async fn remove_for_task(&self, task: TaskId) -> NotificationStoreResult<()>;
}

/// Errors returned by notification store implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationStoreError {
    /// The notification was not found.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    /// Transport-layer failure.
    #[error("notification store error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationStoreError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
