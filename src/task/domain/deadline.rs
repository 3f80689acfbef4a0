//! Calendar-date deadline classification.
//!
//! Every surface that mentions deadlines (dashboard counters, alert
//! banners, the daily popup) must classify through this module so boundary
//! days are never counted differently in different views. All comparisons
//! happen on calendar dates: `now` is taken at start of day and the due
//! date at end of day, so a task due today is never overdue on the same
//! calendar day, and day distances are whole-date differences rather than
//! raw millisecond deltas.

use super::ids::TaskId;
use super::status::TaskStatus;
use super::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Days ahead (excluding today) that count as "upcoming" for alerts.
pub const UPCOMING_WINDOW_DAYS: i64 = 3;

/// Temporal bucket of a task relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeadlineStanding {
    /// Due date has passed and the task is still open.
    Overdue,
    /// Due on the current calendar date.
    DueToday,
    /// Open and due within [`UPCOMING_WINDOW_DAYS`] days, excluding today.
    Upcoming {
        /// Whole days until the due date (1..=window).
        days_left: i64,
    },
    /// Due date lies beyond the upcoming window.
    Future,
    /// Closed (completed or cancelled) with a past due date; no alert
    /// category applies.
    Dormant,
}

/// Classifies `task` relative to `now`.
///
/// Rules are evaluated in priority order; calling twice with the same
/// inputs always yields the same bucket, and `DueToday` is stable across
/// any time of day on the due date.
#[must_use]
pub fn classify(task: &Task, now: DateTime<Utc>) -> DeadlineStanding {
    let today = now.date_naive();
    let due = task.completion_date().date_naive();
    let open = !task.status().is_closed();
    let days_left = due.signed_duration_since(today).num_days();

    if due < today && open {
        return DeadlineStanding::Overdue;
    }
    if due == today {
        return DeadlineStanding::DueToday;
    }
    if open && days_left > 0 && days_left <= UPCOMING_WINDOW_DAYS {
        return DeadlineStanding::Upcoming { days_left };
    }
    if due > today {
        return DeadlineStanding::Future;
    }
    DeadlineStanding::Dormant
}

/// Deadline buckets over a task list, shared by every alerting surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadlineReport {
    /// Open tasks whose due date has passed.
    pub overdue: Vec<TaskId>,
    /// Tasks due on the reference calendar date.
    pub due_today: Vec<TaskId>,
    /// Open tasks due within the upcoming window.
    pub upcoming: Vec<TaskId>,
    /// Tasks past their scheduled start that are still not started.
    pub unstarted: Vec<TaskId>,
}

impl DeadlineReport {
    /// Builds a report over `tasks` relative to `now`.
    #[must_use]
    pub fn build(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut report = Self::default();
        for task in tasks {
            match classify(task, now) {
                DeadlineStanding::Overdue => report.overdue.push(task.id()),
                DeadlineStanding::DueToday => report.due_today.push(task.id()),
                DeadlineStanding::Upcoming { .. } => report.upcoming.push(task.id()),
                DeadlineStanding::Future | DeadlineStanding::Dormant => {}
            }
            if task.status() == TaskStatus::NotStarted && task.start_date().date_naive() <= today {
                report.unstarted.push(task.id());
            }
        }
        report
    }

    /// True when no bucket holds any task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty()
            && self.due_today.is_empty()
            && self.upcoming.is_empty()
            && self.unstarted.is_empty()
    }
}
