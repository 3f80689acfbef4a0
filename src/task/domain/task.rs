//! Task aggregate root and assignment records.

use super::effort::{EffortLogEntry, Labor};
use super::ids::{TaskId, TeamId, UserId};
use super::status::TaskStatus;
use super::{AuthorizationError, TaskAction, TaskDomainError, TaskEvent, policy};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Business priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal scheduling.
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Role a user holds on a task.
///
/// Only the `Assignee` role carries status-change rights; a `Partner`
/// contributes labor but cannot move the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRole {
    /// Primary worker; may change status.
    Assignee,
    /// Contributing worker; may log effort only.
    Partner,
}

/// Binding of a user to a task with a labor budget.
///
/// Unique per (task, user). Never removed once created except by full
/// task deletion; `actual_labor` is derived from the effort ledger and
/// mutated only through [`Task::append_effort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    user: UserId,
    role: AssignmentRole,
    planned_labor: Labor,
    actual_labor: Labor,
}

impl Assignment {
    const fn new(user: UserId, role: AssignmentRole, planned_labor: Labor) -> Self {
        Self {
            user,
            role,
            planned_labor,
            actual_labor: Labor::ZERO,
        }
    }

    /// Returns the assigned user.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the assignment role.
    #[must_use]
    pub const fn role(&self) -> AssignmentRole {
        self.role
    }

    /// Returns the planned labor budget.
    #[must_use]
    pub const fn planned_labor(&self) -> Labor {
        self.planned_labor
    }

    /// Returns the labor logged so far, as summed from the effort ledger.
    #[must_use]
    pub const fn actual_labor(&self) -> Labor {
        self.actual_labor
    }
}

/// Parameter object for creating a task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    description: String,
    priority: Priority,
    team: TeamId,
    start_date: DateTime<Utc>,
    completion_date: DateTime<Utc>,
    creator: UserId,
    planned_labor: Labor,
    assignments: Vec<(UserId, AssignmentRole, Labor)>,
}

impl TaskDraft {
    /// Creates a draft with required fields and medium priority.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        team: TeamId,
        creator: UserId,
        start_date: DateTime<Utc>,
        completion_date: DateTime<Utc>,
    ) -> Self {
        Self {
            description: description.into(),
            priority: Priority::Medium,
            team,
            start_date,
            completion_date,
            creator,
            planned_labor: Labor::ZERO,
            assignments: Vec::new(),
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the overall planned labor budget.
    #[must_use]
    pub const fn with_planned_labor(mut self, planned_labor: Labor) -> Self {
        self.planned_labor = planned_labor;
        self
    }

    /// Adds an initial assignment.
    #[must_use]
    pub fn with_assignment(mut self, user: UserId, role: AssignmentRole, planned: Labor) -> Self {
        self.assignments.push((user, role, planned));
        self
    }
}

/// Task aggregate root.
///
/// Owns its assignments and effort ledger; both are removed together with
/// the task (cascade delete, no orphaned child records).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    description: String,
    priority: Priority,
    status: TaskStatus,
    team: TeamId,
    start_date: DateTime<Utc>,
    completion_date: DateTime<Utc>,
    creator: UserId,
    planned_labor: Labor,
    assignments: Vec<Assignment>,
    effort_log: Vec<EffortLogEntry>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task from a draft, stamped with the current clock time.
    ///
    /// New tasks start in [`TaskStatus::NotStarted`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] for a blank
    /// description, [`TaskDomainError::CompletionBeforeStart`] when the
    /// scheduled dates are out of order, and
    /// [`TaskDomainError::DuplicateAssignment`] when the draft assigns the
    /// same user twice.
    pub fn create(draft: TaskDraft, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        validate_description(&draft.description)?;
        validate_schedule(draft.start_date, draft.completion_date)?;
        let timestamp = clock.utc();

        let mut task = Self {
            id: TaskId::new(),
            description: draft.description,
            priority: draft.priority,
            status: TaskStatus::NotStarted,
            team: draft.team,
            start_date: draft.start_date,
            completion_date: draft.completion_date,
            creator: draft.creator,
            planned_labor: draft.planned_labor,
            assignments: Vec::new(),
            effort_log: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        };
        for (user, role, planned) in draft.assignments {
            task.push_assignment(user, role, planned)?;
        }
        Ok(task)
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the business priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the owning team.
    #[must_use]
    pub const fn team(&self) -> TeamId {
        self.team
    }

    /// Returns the scheduled start.
    #[must_use]
    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Returns the scheduled completion (due) date.
    #[must_use]
    pub const fn completion_date(&self) -> DateTime<Utc> {
        self.completion_date
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn creator(&self) -> UserId {
        self.creator
    }

    /// Returns the overall planned labor budget.
    #[must_use]
    pub const fn planned_labor(&self) -> Labor {
        self.planned_labor
    }

    /// Returns the assignment records in creation order.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Returns the assignment held by `user`, if any.
    #[must_use]
    pub fn assignment_for(&self, user: UserId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.user == user)
    }

    /// Returns the append-only effort ledger in logged order.
    #[must_use]
    pub fn effort_log(&self) -> &[EffortLogEntry] {
        &self.effort_log
    }

    /// Returns total labor logged across all assignments.
    #[must_use]
    pub fn actual_labor(&self) -> Labor {
        self.assignments.iter().map(Assignment::actual_labor).sum()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task to `to`, gated by the authorization policy.
    ///
    /// Returns `Ok(None)` without mutating or emitting anything when `to`
    /// equals the current status. Any pair of distinct statuses is a legal
    /// transition; completed and cancelled tasks can be reopened.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError`] when `actor` is neither the creator
    /// nor an assignee-role assignment holder.
    pub fn change_status(
        &mut self,
        to: TaskStatus,
        actor: UserId,
        clock: &impl Clock,
    ) -> Result<Option<TaskEvent>, AuthorizationError> {
        if !policy::can_change_status(self, actor) {
            return Err(AuthorizationError {
                actor,
                action: TaskAction::ChangeStatus,
                task: self.id,
            });
        }
        if to == self.status {
            return Ok(None);
        }
        let from = self.status;
        self.status = to;
        self.touch(clock);
        Ok(Some(TaskEvent::StatusChanged {
            task: self.id,
            actor,
            from,
            to,
            at: self.updated_at,
        }))
    }

    /// Adds an assignment for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DuplicateAssignment`] when the user
    /// already holds an assignment.
    pub fn assign(
        &mut self,
        user: UserId,
        role: AssignmentRole,
        planned_labor: Labor,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.push_assignment(user, role, planned_labor)?;
        self.touch(clock);
        Ok(())
    }

    /// Appends a ledger entry and recomputes the assignment's labor sum.
    ///
    /// Returns the new cumulative labor total for the entry's user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssigned`] when the entry's user holds
    /// no assignment on this task.
    pub fn append_effort(
        &mut self,
        entry: EffortLogEntry,
        clock: &impl Clock,
    ) -> Result<Labor, TaskDomainError> {
        let user = entry.user();
        if self.assignment_for(user).is_none() {
            return Err(TaskDomainError::NotAssigned {
                task: self.id,
                user,
            });
        }
        self.effort_log.push(entry);
        let total = self
            .effort_log
            .iter()
            .filter(|e| e.user() == user)
            .map(EffortLogEntry::labor)
            .sum();
        if let Some(assignment) = self.assignments.iter_mut().find(|a| a.user == user) {
            assignment.actual_labor = total;
        }
        self.touch(clock);
        Ok(total)
    }

    /// Replaces the description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] for a blank value.
    pub fn set_description(
        &mut self,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let text = description.into();
        validate_description(&text)?;
        self.description = text;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the priority.
    pub fn set_priority(&mut self, priority: Priority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Replaces the overall planned labor budget.
    pub fn set_planned_labor(&mut self, planned_labor: Labor, clock: &impl Clock) {
        self.planned_labor = planned_labor;
        self.touch(clock);
    }

    /// Replaces the scheduled dates.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CompletionBeforeStart`] when the
    /// completion calendar date precedes the start calendar date.
    pub fn reschedule(
        &mut self,
        start_date: DateTime<Utc>,
        completion_date: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        validate_schedule(start_date, completion_date)?;
        self.start_date = start_date;
        self.completion_date = completion_date;
        self.touch(clock);
        Ok(())
    }

    fn push_assignment(
        &mut self,
        user: UserId,
        role: AssignmentRole,
        planned_labor: Labor,
    ) -> Result<(), TaskDomainError> {
        if self.assignment_for(user).is_some() {
            return Err(TaskDomainError::DuplicateAssignment {
                task: self.id,
                user,
            });
        }
        self.assignments
            .push(Assignment::new(user, role, planned_labor));
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validate_description(description: &str) -> Result<(), TaskDomainError> {
    if description.trim().is_empty() {
        return Err(TaskDomainError::EmptyDescription);
    }
    Ok(())
}

/// Dates are compared on calendar dates so a same-day schedule is legal.
fn validate_schedule(
    start: DateTime<Utc>,
    completion: DateTime<Utc>,
) -> Result<(), TaskDomainError> {
    if completion.date_naive() < start.date_naive() {
        return Err(TaskDomainError::CompletionBeforeStart {
            start: start.date_naive(),
            completion: completion.date_naive(),
        });
    }
    Ok(())
}
