//! Shared fixtures for workflow tests.

use chrono::{DateTime, TimeZone, Utc};
use eyre::OptionExt;
use mockable::DefaultClock;
use std::sync::Arc;

use crate::notification::adapters::InMemoryNotificationStore;
use crate::notification::domain::Locale;
use crate::notification::services::NotificationDispatcher;
use crate::task::adapters::memory::InMemoryTaskStore;
use crate::task::domain::{
    AssignmentRole, Labor, Task, TaskDraft, TeamId, UserId,
};

/// Builds a UTC timestamp at 08:00 on the given calendar date.
pub(super) fn at_morning(year: i32, month: u32, day: u32) -> eyre::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 8, 0, 0)
        .single()
        .ok_or_eyre("invalid calendar date")
}

/// Builds a UTC timestamp at an arbitrary time on the given date.
pub(super) fn at_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> eyre::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .ok_or_eyre("invalid calendar date")
}

/// Cast of users shared by most scenarios.
#[derive(Debug, Clone, Copy)]
pub(super) struct Cast {
    pub creator: UserId,
    pub assignee: UserId,
    pub partner: UserId,
    pub outsider: UserId,
}

impl Cast {
    pub(super) fn new() -> Self {
        Self {
            creator: UserId::new(),
            assignee: UserId::new(),
            partner: UserId::new(),
            outsider: UserId::new(),
        }
    }
}

/// Creates a task with an assignee and a partner, due 2024-06-14.
pub(super) fn sample_task(cast: Cast) -> eyre::Result<Task> {
    let draft = TaskDraft::new(
        "Prepare quarterly report",
        TeamId::new(),
        cast.creator,
        at_morning(2024, 6, 3)?,
        at_morning(2024, 6, 14)?,
    )
    .with_planned_labor(Labor::from_hours(24))
    .with_assignment(cast.assignee, AssignmentRole::Assignee, Labor::from_hours(16))
    .with_assignment(cast.partner, AssignmentRole::Partner, Labor::from_hours(8));
    Ok(Task::create(draft, &DefaultClock)?)
}

/// Store, notification, and clock collaborators for service tests.
pub(super) struct Harness {
    pub store: Arc<InMemoryTaskStore>,
    pub notifications: Arc<InMemoryNotificationStore>,
    pub dispatcher: NotificationDispatcher<InMemoryNotificationStore, DefaultClock>,
    pub clock: Arc<DefaultClock>,
}

impl Harness {
    pub(super) fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let notifications = Arc::new(InMemoryNotificationStore::new());
        let clock = Arc::new(DefaultClock);
        let dispatcher =
            NotificationDispatcher::new(Arc::clone(&notifications), Arc::clone(&clock), Locale::En);
        Self {
            store,
            notifications,
            dispatcher,
            clock,
        }
    }
}

/// Creates a minimal task owned by `creator` with the given due date.
pub(super) fn task_due(
    creator: UserId,
    completion: DateTime<Utc>,
) -> eyre::Result<Task> {
    let draft = TaskDraft::new(
        "Review launch checklist",
        TeamId::new(),
        creator,
        at_morning(2024, 6, 1)?,
        completion,
    );
    Ok(Task::create(draft, &DefaultClock)?)
}
