//! Unit tests for aggregate construction and the effort ledger fold.

use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::rstest;

use super::support::{Cast, at_morning, sample_task};
use crate::task::domain::{
    AssignmentRole, EffortLogEntry, Labor, Task, TaskDomainError, TaskDraft, TeamId, UserId,
};

#[rstest]
fn blank_descriptions_are_rejected() -> eyre::Result<()> {
    let draft = TaskDraft::new(
        "   ",
        TeamId::new(),
        UserId::new(),
        at_morning(2024, 6, 3)?,
        at_morning(2024, 6, 14)?,
    );

    let result = Task::create(draft, &DefaultClock);

    ensure!(result == Err(TaskDomainError::EmptyDescription));
    Ok(())
}

#[rstest]
fn completion_before_start_is_rejected() -> eyre::Result<()> {
    let draft = TaskDraft::new(
        "Backfill audit log",
        TeamId::new(),
        UserId::new(),
        at_morning(2024, 6, 14)?,
        at_morning(2024, 6, 3)?,
    );

    match Task::create(draft, &DefaultClock) {
        Err(TaskDomainError::CompletionBeforeStart { .. }) => Ok(()),
        other => bail!("expected schedule rejection, got {other:?}"),
    }
}

/// Same-day schedules are legal; the comparison is on calendar dates.
#[rstest]
fn same_day_schedule_is_accepted() -> eyre::Result<()> {
    let draft = TaskDraft::new(
        "Hotfix deploy",
        TeamId::new(),
        UserId::new(),
        at_morning(2024, 6, 14)?,
        at_morning(2024, 6, 14)?,
    );

    ensure!(Task::create(draft, &DefaultClock).is_ok());
    Ok(())
}

#[rstest]
fn duplicate_draft_assignments_are_rejected() -> eyre::Result<()> {
    let user = UserId::new();
    let draft = TaskDraft::new(
        "Prepare workshop",
        TeamId::new(),
        UserId::new(),
        at_morning(2024, 6, 3)?,
        at_morning(2024, 6, 14)?,
    )
    .with_assignment(user, AssignmentRole::Assignee, Labor::from_hours(4))
    .with_assignment(user, AssignmentRole::Partner, Labor::from_hours(2));

    match Task::create(draft, &DefaultClock) {
        Err(TaskDomainError::DuplicateAssignment { .. }) => Ok(()),
        other => bail!("expected duplicate rejection, got {other:?}"),
    }
}

#[rstest]
fn assigning_the_same_user_twice_is_rejected() -> eyre::Result<()> {
    let cast = Cast::new();
    let mut task = sample_task(cast)?;

    let result = task.assign(
        cast.assignee,
        AssignmentRole::Partner,
        Labor::from_hours(1),
        &DefaultClock,
    );

    ensure!(matches!(
        result,
        Err(TaskDomainError::DuplicateAssignment { .. })
    ));
    Ok(())
}

/// An assignment's actual labor is always the sum of that user's ledger
/// entries, and the task total is the sum over assignments.
#[rstest]
fn actual_labor_is_a_fold_over_ledger_entries() -> eyre::Result<()> {
    let cast = Cast::new();
    let mut task = sample_task(cast)?;

    for minutes in [90_u32, 30, 45] {
        let entry = EffortLogEntry::new(
            task.id(),
            cast.assignee,
            Labor::from_minutes(minutes),
            "implementation",
            &DefaultClock,
        )?;
        let _total = task.append_effort(entry, &DefaultClock)?;
    }
    let partner_entry = EffortLogEntry::new(
        task.id(),
        cast.partner,
        Labor::from_minutes(60),
        "review",
        &DefaultClock,
    )?;
    let _partner_total = task.append_effort(partner_entry, &DefaultClock)?;

    let assignee_total = task
        .assignment_for(cast.assignee)
        .map(|a| a.actual_labor())
        .unwrap_or_default();
    ensure!(assignee_total == Labor::from_minutes(165));
    ensure!(task.actual_labor() == Labor::from_minutes(225));
    ensure!(task.effort_log().len() == 4);
    Ok(())
}

#[rstest]
fn zero_labor_entries_are_rejected() -> eyre::Result<()> {
    let result = EffortLogEntry::new(
        crate::task::domain::TaskId::new(),
        UserId::new(),
        Labor::ZERO,
        "nothing",
        &DefaultClock,
    );

    ensure!(result == Err(TaskDomainError::EmptyEffort));
    Ok(())
}

#[rstest]
fn effort_from_unassigned_users_is_rejected() -> eyre::Result<()> {
    let cast = Cast::new();
    let mut task = sample_task(cast)?;
    let entry = EffortLogEntry::new(
        task.id(),
        cast.outsider,
        Labor::from_minutes(30),
        "drive-by work",
        &DefaultClock,
    )?;

    let result = task.append_effort(entry, &DefaultClock);

    ensure!(matches!(result, Err(TaskDomainError::NotAssigned { .. })));
    ensure!(task.effort_log().is_empty());
    Ok(())
}

#[rstest]
#[case(0, "0h 00m")]
#[case(45, "0h 45m")]
#[case(60, "1h 00m")]
#[case(495, "8h 15m")]
fn labor_renders_hours_and_minutes(#[case] minutes: u32, #[case] expected: &str) {
    assert_eq!(Labor::from_minutes(minutes).to_string(), expected);
}

/// Events carry a snake_case type tag on the wire.
#[rstest]
fn events_serialize_with_a_type_tag() -> eyre::Result<()> {
    use crate::task::domain::{TaskEvent, TaskStatus};

    let event = TaskEvent::StatusChanged {
        task: crate::task::domain::TaskId::new(),
        actor: UserId::new(),
        from: TaskStatus::NotStarted,
        to: TaskStatus::InProgress,
        at: at_morning(2024, 6, 10)?,
    };

    let value = serde_json::to_value(&event)?;
    ensure!(value.get("type").and_then(serde_json::Value::as_str) == Some("status_changed"));
    ensure!(value.get("from").and_then(serde_json::Value::as_str) == Some("not_started"));
    ensure!(value.get("to").and_then(serde_json::Value::as_str) == Some("in_progress"));
    Ok(())
}

#[rstest]
fn rescheduling_validates_date_order() -> eyre::Result<()> {
    let cast = Cast::new();
    let mut task = sample_task(cast)?;

    let result = task.reschedule(at_morning(2024, 7, 1)?, at_morning(2024, 6, 20)?, &DefaultClock);

    ensure!(matches!(
        result,
        Err(TaskDomainError::CompletionBeforeStart { .. })
    ));
    Ok(())
}
