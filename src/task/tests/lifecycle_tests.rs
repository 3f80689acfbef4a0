//! Unit tests for the task lifecycle service.

use eyre::{bail, ensure};
use std::sync::Arc;

use super::support::{Cast, Harness, at_morning};
use crate::notification::ports::NotificationStore;
use crate::task::domain::{
    AssignmentRole, Labor, Priority, TaskDraft, TeamId,
};
use crate::task::ports::TaskStore;
use crate::task::services::{TaskLifecycleError, TaskLifecycleService, TaskPatch};

fn service(
    harness: &Harness,
) -> TaskLifecycleService<
    crate::task::adapters::memory::InMemoryTaskStore,
    crate::notification::adapters::InMemoryNotificationStore,
    mockable::DefaultClock,
> {
    TaskLifecycleService::new(
        Arc::clone(&harness.store),
        harness.dispatcher.clone(),
        Arc::clone(&harness.clock),
    )
}

fn draft(cast: Cast) -> eyre::Result<TaskDraft> {
    Ok(TaskDraft::new(
        "Migrate billing exports",
        TeamId::new(),
        cast.creator,
        at_morning(2024, 6, 3)?,
        at_morning(2024, 6, 21)?,
    )
    .with_priority(Priority::High)
    .with_assignment(cast.assignee, AssignmentRole::Assignee, Labor::from_hours(12))
    .with_assignment(cast.partner, AssignmentRole::Partner, Labor::from_hours(6)))
}

#[tokio::test]
async fn creation_persists_and_notifies_initial_assignees() -> eyre::Result<()> {
    let harness = Harness::new();
    let cast = Cast::new();
    let lifecycle = service(&harness);

    let task = lifecycle.create(draft(cast)?).await?;

    ensure!(harness.store.find_by_id(task.id()).await?.is_some());
    ensure!(harness.notifications.list(cast.assignee).await?.len() == 1);
    ensure!(harness.notifications.list(cast.partner).await?.len() == 1);
    ensure!(harness.notifications.list(cast.creator).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn only_the_creator_edits_metadata() -> eyre::Result<()> {
    let harness = Harness::new();
    let cast = Cast::new();
    let lifecycle = service(&harness);
    let task = lifecycle.create(draft(cast)?).await?;

    let denied = lifecycle
        .edit_details(
            task.id(),
            TaskPatch::new().with_priority(Priority::Low),
            cast.assignee,
        )
        .await;
    match denied {
        Err(TaskLifecycleError::Authorization(_)) => {}
        other => bail!("expected authorization error, got {other:?}"),
    }

    let updated = lifecycle
        .edit_details(
            task.id(),
            TaskPatch::new()
                .with_description("Migrate billing exports to v2")
                .with_priority(Priority::Medium),
            cast.creator,
        )
        .await?;
    ensure!(updated.description() == "Migrate billing exports to v2");
    ensure!(updated.priority() == Priority::Medium);
    Ok(())
}

#[tokio::test]
async fn invalid_patches_leave_the_task_unchanged() -> eyre::Result<()> {
    let harness = Harness::new();
    let cast = Cast::new();
    let lifecycle = service(&harness);
    let task = lifecycle.create(draft(cast)?).await?;

    let result = lifecycle
        .edit_details(
            task.id(),
            TaskPatch::new().with_schedule(at_morning(2024, 7, 1)?, at_morning(2024, 6, 1)?),
            cast.creator,
        )
        .await;

    ensure!(matches!(result, Err(TaskLifecycleError::Domain(_))));
    let stored = harness
        .store
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task vanished"))?;
    ensure!(stored.completion_date() == task.completion_date());
    Ok(())
}

#[tokio::test]
async fn later_assignment_notifies_the_new_assignee() -> eyre::Result<()> {
    let harness = Harness::new();
    let cast = Cast::new();
    let lifecycle = service(&harness);
    let task = lifecycle.create(draft(cast)?).await?;

    let updated = lifecycle
        .assign(
            task.id(),
            cast.outsider,
            AssignmentRole::Partner,
            Labor::from_hours(3),
            cast.creator,
        )
        .await?;

    ensure!(updated.assignment_for(cast.outsider).is_some());
    ensure!(harness.notifications.list(cast.outsider).await?.len() == 1);
    Ok(())
}

#[tokio::test]
async fn deletion_cascades_to_notifications() -> eyre::Result<()> {
    let harness = Harness::new();
    let cast = Cast::new();
    let lifecycle = service(&harness);
    let task = lifecycle.create(draft(cast)?).await?;
    ensure!(!harness.notifications.list(cast.assignee).await?.is_empty());

    lifecycle.delete(task.id(), cast.creator).await?;

    ensure!(harness.store.find_by_id(task.id()).await?.is_none());
    ensure!(harness.notifications.list(cast.assignee).await?.is_empty());
    ensure!(harness.notifications.list(cast.partner).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn only_the_creator_deletes() -> eyre::Result<()> {
    let harness = Harness::new();
    let cast = Cast::new();
    let lifecycle = service(&harness);
    let task = lifecycle.create(draft(cast)?).await?;

    let result = lifecycle.delete(task.id(), cast.assignee).await;

    ensure!(matches!(result, Err(TaskLifecycleError::Authorization(_))));
    ensure!(harness.store.find_by_id(task.id()).await?.is_some());
    Ok(())
}
