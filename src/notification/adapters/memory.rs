//! In-memory notification store for tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::notification::domain::{Notification, NotificationId};
use crate::notification::ports::{
    NotificationStore, NotificationStoreError, NotificationStoreResult,
};
use crate::task::domain::{TaskId, UserId};

/// Thread-safe in-memory notification store.
///
/// Holds records in insertion order; the single write lock makes
/// `mark_all_read` atomic with respect to concurrent readers.
#[derive(Clone, Default)]
pub struct InMemoryNotificationStore {
    state: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned(err: impl std::fmt::Display) -> NotificationStoreError {
        NotificationStoreError::transport(std::io::Error::other(err.to_string()))
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn create(&self, notification: &Notification) -> NotificationStoreResult<()> {
        let mut state = self.state.write().map_err(Self::lock_poisoned)?;
        state.push(notification.clone());
        Ok(())
    }

    async fn mark_read(&self, id: NotificationId) -> NotificationStoreResult<()> {
        let mut state = self.state.write().map_err(Self::lock_poisoned)?;
        let notification = state
            .iter_mut()
            .find(|n| n.id() == id)
            .ok_or(NotificationStoreError::NotFound(id))?;
        let _changed: bool = notification.mark_read();
        Ok(())
    }

    async fn mark_all_read(&self, receiver: UserId) -> NotificationStoreResult<usize> {
        let mut state = self.state.write().map_err(Self::lock_poisoned)?;
        let mut changed = 0;
        for notification in state.iter_mut().filter(|n| n.receiver() == receiver) {
            if notification.mark_read() {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn list(&self, receiver: UserId) -> NotificationStoreResult<Vec<Notification>> {
        let state = self.state.read().map_err(Self::lock_poisoned)?;
        let mut notifications: Vec<Notification> = state
            .iter()
            .filter(|n| n.receiver() == receiver)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(notifications)
    }

    async fn unread_count(&self, receiver: UserId) -> NotificationStoreResult<usize> {
        let state = self.state.read().map_err(Self::lock_poisoned)?;
        Ok(state
            .iter()
            .filter(|n| n.receiver() == receiver && !n.is_read())
            .count())
    }

    async fn remove_for_task(&self, task: TaskId) -> NotificationStoreResult<()> {
        let mut state = self.state.write().map_err(Self::lock_poisoned)?;
        state.retain(|n| n.task() != Some(task));
        Ok(())
    }
}
