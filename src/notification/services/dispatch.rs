//! Domain-event to notification dispatch, plus the per-user inbox.

use minijinja::context;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

use crate::notification::domain::{Locale, Notification, NotificationId, NotificationKind};
use crate::notification::ports::{NotificationStore, NotificationStoreError};
use crate::notification::services::catalog::{MessageCatalog, MessageKey, RenderError};
use crate::task::domain::{AssignmentRole, Task, TaskEvent, TaskId, UserId};

/// Errors raised while dispatching or managing notifications.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The notification store rejected the operation.
    #[error(transparent)]
    Store(#[from] NotificationStoreError),
    /// A message template failed to render.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Turns task domain events into notification records and manages the
/// receiver-side inbox.
///
/// Dispatch performs no deduplication: repeated events of the same kind
/// produce repeated notification records, one per occurrence.
pub struct NotificationDispatcher<S, C>
where
    S: NotificationStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    catalog: MessageCatalog,
    locale: Locale,
    clock: Arc<C>,
}

impl<S, C> Clone for NotificationDispatcher<S, C>
where
    S: NotificationStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            catalog: self.catalog.clone(),
            locale: self.locale,
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> NotificationDispatcher<S, C>
where
    S: NotificationStore,
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher rendering messages in `locale`.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, locale: Locale) -> Self {
        Self {
            store,
            catalog: MessageCatalog::new(),
            locale,
            clock,
        }
    }

    /// Consumes a domain event and persists one notification per relevant
    /// counterpart: the creator for events initiated by someone else, the
    /// assignee-role holders for creator-initiated events, and the new
    /// assignee for assignment events. Self-notifications are suppressed.
    ///
    /// Returns the created notifications.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when rendering or persistence fails.
    pub async fn dispatch(
        &self,
        event: &TaskEvent,
        task: &Task,
    ) -> Result<Vec<Notification>, DispatchError> {
        let receivers = route(event, task);
        if receivers.is_empty() {
            tracing::debug!(task = %event.task(), "event has no notification counterpart");
            return Ok(Vec::new());
        }

        let (kind, message) = self.render_event(event, task)?;
        let mut created = Vec::with_capacity(receivers.len());
        for receiver in receivers {
            let notification = Notification::new(
                Some(task.id()),
                event.actor(),
                receiver,
                kind,
                message.clone(),
                &*self.clock,
            );
            self.store.create(&notification).await?;
            created.push(notification);
        }
        tracing::debug!(
            task = %task.id(),
            kind = kind.as_str(),
            count = created.len(),
            "dispatched notifications"
        );
        Ok(created)
    }

    /// Creates a deadline alert for `receiver`, sent on behalf of the
    /// task's creator.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when rendering or persistence fails.
    pub async fn notify_deadline(
        &self,
        task: &Task,
        receiver: UserId,
    ) -> Result<Notification, DispatchError> {
        let message = self.catalog.render(
            self.locale,
            MessageKey::Deadline,
            &context! {
                task => task.description(),
                when => task.completion_date().date_naive().to_string(),
            },
        )?;
        let notification = Notification::new(
            Some(task.id()),
            task.creator(),
            receiver,
            NotificationKind::Deadline,
            message,
            &*self.clock,
        );
        self.store.create(&notification).await?;
        Ok(notification)
    }

    /// Creates a mention notification from `sender` to `receiver`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when rendering or persistence fails.
    pub async fn notify_mention(
        &self,
        task: &Task,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Notification, DispatchError> {
        let message = self.catalog.render(
            self.locale,
            MessageKey::Mention,
            &context! { task => task.description() },
        )?;
        let notification = Notification::new(
            Some(task.id()),
            sender,
            receiver,
            NotificationKind::Mention,
            message,
            &*self.clock,
        );
        self.store.create(&notification).await?;
        Ok(notification)
    }

    /// Marks a notification read. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] for an unknown identifier or a
    /// transport failure.
    pub async fn mark_as_read(&self, id: NotificationId) -> Result<(), DispatchError> {
        Ok(self.store.mark_read(id).await?)
    }

    /// Marks every unread notification for `receiver` read and returns
    /// how many changed. Atomic from the caller's perspective; retrying
    /// leaves nothing half-updated.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] on transport failure.
    pub async fn mark_all_as_read(&self, receiver: UserId) -> Result<usize, DispatchError> {
        Ok(self.store.mark_all_read(receiver).await?)
    }

    /// Lists the receiver's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] on transport failure.
    pub async fn inbox(&self, receiver: UserId) -> Result<Vec<Notification>, DispatchError> {
        Ok(self.store.list(receiver).await?)
    }

    /// Counts the receiver's unread notifications (badge counter).
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] on transport failure.
    pub async fn unread_count(&self, receiver: UserId) -> Result<usize, DispatchError> {
        Ok(self.store.unread_count(receiver).await?)
    }

    /// Removes every notification for a deleted task (cascade delete).
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] on transport failure.
    pub async fn purge_task(&self, task: TaskId) -> Result<(), DispatchError> {
        Ok(self.store.remove_for_task(task).await?)
    }

    fn render_event(
        &self,
        event: &TaskEvent,
        task: &Task,
    ) -> Result<(NotificationKind, String), RenderError> {
        match event {
            TaskEvent::StatusChanged { from, to, .. } => {
                let message = self.catalog.render(
                    self.locale,
                    MessageKey::StatusChanged,
                    &context! {
                        task => task.description(),
                        from => from.label(),
                        to => to.label(),
                    },
                )?;
                Ok((NotificationKind::Update, message))
            }
            TaskEvent::EffortLogged { labor, total, .. } => {
                let message = self.catalog.render(
                    self.locale,
                    MessageKey::EffortLogged,
                    &context! {
                        task => task.description(),
                        labor => labor.to_string(),
                        total => total.to_string(),
                    },
                )?;
                Ok((NotificationKind::Update, message))
            }
            TaskEvent::TaskAssigned { role, .. } => {
                let message = self.catalog.render(
                    self.locale,
                    MessageKey::TaskAssigned,
                    &context! {
                        task => task.description(),
                        role => role_label(*role),
                    },
                )?;
                Ok((NotificationKind::Assignment, message))
            }
        }
    }
}

const fn role_label(role: AssignmentRole) -> &'static str {
    match role {
        AssignmentRole::Assignee => "assignee",
        AssignmentRole::Partner => "partner",
    }
}

/// Selects the counterpart receivers for an event.
fn route(event: &TaskEvent, task: &Task) -> Vec<UserId> {
    match event {
        TaskEvent::TaskAssigned { assignee, actor, .. } => {
            if assignee == actor {
                Vec::new()
            } else {
                vec![*assignee]
            }
        }
        TaskEvent::StatusChanged { actor, .. } | TaskEvent::EffortLogged { actor, .. } => {
            if *actor == task.creator() {
                task.assignments()
                    .iter()
                    .filter(|a| a.role() == AssignmentRole::Assignee && a.user() != *actor)
                    .map(|a| a.user())
                    .collect()
            } else {
                vec![task.creator()]
            }
        }
    }
}
