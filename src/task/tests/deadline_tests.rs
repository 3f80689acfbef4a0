//! Unit tests for calendar-date deadline classification.

use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::rstest;

use super::support::{Cast, at_morning, at_time, sample_task, task_due};
use crate::task::domain::{
    DeadlineReport, DeadlineStanding, TaskStatus, UserId, classify,
};

#[rstest]
#[case((2024, 6, 10), DeadlineStanding::DueToday)]
#[case((2024, 6, 9), DeadlineStanding::Overdue)]
#[case((2024, 6, 11), DeadlineStanding::Upcoming { days_left: 1 })]
#[case((2024, 6, 13), DeadlineStanding::Upcoming { days_left: 3 })]
#[case((2024, 6, 14), DeadlineStanding::Future)]
fn open_tasks_bucket_by_calendar_distance(
    #[case] due: (i32, u32, u32),
    #[case] expected: DeadlineStanding,
) -> eyre::Result<()> {
    let task = task_due(UserId::new(), at_morning(due.0, due.1, due.2)?)?;
    let now = at_time(2024, 6, 10, 8, 0)?;

    let standing = classify(&task, now);

    if standing != expected {
        bail!("expected {expected:?}, got {standing:?}");
    }
    Ok(())
}

/// A task due today stays `DueToday` at any time of day; classification
/// depends on calendar-date equality, never on the time component.
#[rstest]
#[case(0, 5)]
#[case(8, 0)]
#[case(12, 30)]
#[case(23, 55)]
fn due_today_is_stable_across_the_day(
    #[case] hour: u32,
    #[case] minute: u32,
) -> eyre::Result<()> {
    let task = task_due(UserId::new(), at_morning(2024, 6, 10)?)?;
    let now = at_time(2024, 6, 10, hour, minute)?;

    ensure!(classify(&task, now) == DeadlineStanding::DueToday);
    Ok(())
}

#[rstest]
fn classification_is_deterministic() -> eyre::Result<()> {
    let task = task_due(UserId::new(), at_morning(2024, 6, 12)?)?;
    let now = at_time(2024, 6, 10, 17, 45)?;

    ensure!(classify(&task, now) == classify(&task, now));
    Ok(())
}

/// Completed and cancelled tasks never count as overdue.
#[rstest]
#[case(TaskStatus::Completed)]
#[case(TaskStatus::Cancelled)]
fn closed_tasks_with_past_due_dates_are_dormant(
    #[case] status: TaskStatus,
) -> eyre::Result<()> {
    let creator = UserId::new();
    let mut task = task_due(creator, at_morning(2024, 6, 5)?)?;
    let _event = task.change_status(status, creator, &DefaultClock)?;

    let now = at_morning(2024, 6, 10)?;
    ensure!(classify(&task, now) == DeadlineStanding::Dormant);
    Ok(())
}

/// Due-today classification applies to closed tasks too: the date rule
/// outranks the status rule for the current calendar day.
#[rstest]
fn closed_task_due_today_is_still_due_today() -> eyre::Result<()> {
    let creator = UserId::new();
    let mut task = task_due(creator, at_morning(2024, 6, 10)?)?;
    let _event = task.change_status(TaskStatus::Completed, creator, &DefaultClock)?;

    ensure!(classify(&task, at_morning(2024, 6, 10)?) == DeadlineStanding::DueToday);
    Ok(())
}

#[rstest]
fn report_groups_tasks_into_shared_buckets() -> eyre::Result<()> {
    let creator = UserId::new();
    let overdue = task_due(creator, at_morning(2024, 6, 8)?)?;
    let today = task_due(creator, at_morning(2024, 6, 10)?)?;
    let upcoming = task_due(creator, at_morning(2024, 6, 12)?)?;
    let future = task_due(creator, at_morning(2024, 6, 20)?)?;
    let tasks = vec![overdue.clone(), today.clone(), upcoming.clone(), future.clone()];

    let report = DeadlineReport::build(&tasks, at_time(2024, 6, 10, 9, 15)?);

    ensure!(report.overdue == vec![overdue.id()]);
    ensure!(report.due_today == vec![today.id()]);
    ensure!(report.upcoming == vec![upcoming.id()]);
    ensure!(!report.is_empty());
    Ok(())
}

/// Tasks past their scheduled start that were never started surface in
/// the report even when their due date is far away.
#[rstest]
fn report_flags_unstarted_tasks_past_their_start_date() -> eyre::Result<()> {
    let cast = Cast::new();
    let task = sample_task(cast)?;
    ensure!(task.status() == TaskStatus::NotStarted);

    let report = DeadlineReport::build(std::slice::from_ref(&task), at_morning(2024, 6, 10)?);

    ensure!(report.unstarted == vec![task.id()]);
    Ok(())
}

/// A started task is never flagged as unstarted.
#[rstest]
fn report_skips_started_tasks() -> eyre::Result<()> {
    let cast = Cast::new();
    let mut task = sample_task(cast)?;
    let _event = task.change_status(TaskStatus::InProgress, cast.creator, &DefaultClock)?;

    let report = DeadlineReport::build(std::slice::from_ref(&task), at_morning(2024, 6, 10)?);

    ensure!(report.unstarted.is_empty());
    Ok(())
}

mod alert_service {
    use eyre::ensure;
    use std::sync::Arc;

    use super::super::support::at_morning;
    use crate::task::adapters::memory::{InMemoryIdentityDirectory, InMemoryTaskStore};
    use crate::task::domain::{Task, TaskDraft, TeamId, UserId};
    use crate::task::ports::{Principal, TaskStore, UserRole};
    use crate::task::services::{AlertError, DeadlineAlertService};

    struct Office {
        manager: UserId,
        employee: UserId,
        own_task: Task,
        other_task: Task,
        service: DeadlineAlertService<InMemoryTaskStore, InMemoryIdentityDirectory>,
    }

    async fn office() -> eyre::Result<Office> {
        let team = TeamId::new();
        let manager = UserId::new();
        let employee = UserId::new();
        let colleague = UserId::new();

        let own_task = Task::create(
            TaskDraft::new(
                "File the expense report",
                team,
                employee,
                at_morning(2024, 6, 3)?,
                at_morning(2024, 6, 10)?,
            ),
            &mockable::DefaultClock,
        )?;
        let other_task = Task::create(
            TaskDraft::new(
                "Order new badges",
                team,
                colleague,
                at_morning(2024, 6, 3)?,
                at_morning(2024, 6, 8)?,
            ),
            &mockable::DefaultClock,
        )?;

        let store = Arc::new(InMemoryTaskStore::new());
        store.store(&own_task).await?;
        store.store(&other_task).await?;
        let directory = Arc::new(InMemoryIdentityDirectory::new());
        directory.register(Principal {
            id: manager,
            role: UserRole::Manager,
            team,
        })?;
        directory.register(Principal {
            id: employee,
            role: UserRole::Employee,
            team,
        })?;
        let service = DeadlineAlertService::new(store, directory);
        Ok(Office {
            manager,
            employee,
            own_task,
            other_task,
            service,
        })
    }

    #[tokio::test]
    async fn managers_see_the_whole_team() -> eyre::Result<()> {
        let office = office().await?;

        let report = office
            .service
            .report_for(office.manager, at_morning(2024, 6, 10)?)
            .await?;

        ensure!(report.due_today == vec![office.own_task.id()]);
        ensure!(report.overdue == vec![office.other_task.id()]);
        ensure!(report.unstarted.len() == 2);
        Ok(())
    }

    /// Employees see only their own tasks and never the unstarted bucket.
    #[tokio::test]
    async fn employees_see_only_their_own_tasks() -> eyre::Result<()> {
        let office = office().await?;

        let report = office
            .service
            .report_for(office.employee, at_morning(2024, 6, 10)?)
            .await?;

        ensure!(report.due_today == vec![office.own_task.id()]);
        ensure!(report.overdue.is_empty());
        ensure!(report.unstarted.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_users_are_rejected() -> eyre::Result<()> {
        let office = office().await?;

        let result = office
            .service
            .report_for(UserId::new(), at_morning(2024, 6, 10)?)
            .await;

        ensure!(matches!(result, Err(AlertError::UnknownUser(_))));
        Ok(())
    }
}
