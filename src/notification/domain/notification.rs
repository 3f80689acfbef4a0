//! Notification record and its read-state rule.

use crate::task::domain::{TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The receiver was bound to a task.
    Assignment,
    /// A task the receiver cares about changed (status or effort).
    Update,
    /// A deadline alert.
    Deadline,
    /// The receiver was mentioned.
    Mention,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::Update => "update",
            Self::Deadline => "deadline",
            Self::Mention => "mention",
        }
    }
}

/// Message locale for rendered notification bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Turkish.
    Tr,
}

impl Locale {
    /// Returns the language tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tr => "tr",
        }
    }
}

/// A delivered notification.
///
/// Immutable after creation except for `is_read`, which transitions only
/// from unread to read and never reverts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    task: Option<TaskId>,
    sender: UserId,
    receiver: UserId,
    kind: NotificationKind,
    message: String,
    created_at: DateTime<Utc>,
    is_read: bool,
}

impl Notification {
    /// Creates an unread notification stamped with the current clock time.
    #[must_use]
    pub fn new(
        task: Option<TaskId>,
        sender: UserId,
        receiver: UserId,
        kind: NotificationKind,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            task,
            sender,
            receiver,
            kind,
            message: message.into(),
            created_at: clock.utc(),
            is_read: false,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the related task, if any.
    #[must_use]
    pub const fn task(&self) -> Option<TaskId> {
        self.task
    }

    /// Returns the user whose action produced the notification.
    #[must_use]
    pub const fn sender(&self) -> UserId {
        self.sender
    }

    /// Returns the user the notification is addressed to.
    #[must_use]
    pub const fn receiver(&self) -> UserId {
        self.receiver
    }

    /// Returns the notification category.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the rendered message body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether the receiver has read the notification.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Marks the notification read. Idempotent: marking an already-read
    /// notification again is a no-op and reports `false`.
    pub const fn mark_read(&mut self) -> bool {
        if self.is_read {
            return false;
        }
        self.is_read = true;
        true
    }
}
