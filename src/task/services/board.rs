//! Drag-and-drop board synchronization.
//!
//! The board maps every task to exactly one column via its status. A
//! drag-drop move runs a two-phase local-apply/confirm-or-compensate
//! protocol: the card moves optimistically before the store confirms, and
//! a failed confirmation rolls the card back to its exact prior column
//! and position. Each card carries its own `{committed, pending}` pair,
//! so in-flight moves of distinct tasks never share mutable state.

use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::notification::ports::NotificationStore;
use crate::notification::services::NotificationDispatcher;
use crate::task::domain::{
    AuthorizationError, Task, TaskAction, TaskEvent, TaskId, TaskStatus, UserId, policy,
};
use crate::task::ports::{TaskFilter, TaskStore, TaskStoreError};

/// Errors surfaced by board operations.
///
/// `Forbidden` and `NotSaved` deliberately read differently: "you are not
/// allowed to do that" versus "your change was not saved".
#[derive(Debug, Error)]
pub enum BoardError {
    /// The actor may not move this task. No store call was issued.
    #[error(transparent)]
    Forbidden(#[from] AuthorizationError),
    /// The task is not on the board.
    #[error("task not on board: {0}")]
    UnknownTask(TaskId),
    /// The task already has an unresolved move; new attempts are rejected
    /// rather than interleaved.
    #[error("task {0} already has a move in flight")]
    MoveInFlight(TaskId),
    /// The store rejected the move; the card was rolled back and the
    /// change was not saved.
    #[error("change to task {task} was not saved: {source}")]
    NotSaved {
        /// Task whose move failed.
        task: TaskId,
        /// Underlying store failure.
        source: TaskStoreError,
    },
    /// The board could not be (re)loaded from the store.
    #[error("board refresh failed: {0}")]
    LoadFailed(#[source] TaskStoreError),
}

/// Column-and-position of a card on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPosition {
    /// Column, keyed by status.
    pub status: TaskStatus,
    /// Index within the column.
    pub index: usize,
}

#[derive(Debug, Clone, Copy)]
struct CardSlot {
    committed: CardPosition,
    pending: Option<CardPosition>,
}

/// Pure board state: per-status columns plus per-card slot tracking.
#[derive(Debug, Clone, Default)]
pub struct BoardModel {
    columns: HashMap<TaskStatus, Vec<TaskId>>,
    slots: HashMap<TaskId, CardSlot>,
}

impl BoardModel {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the board from a task snapshot, dropping any pending
    /// state.
    pub fn load(&mut self, tasks: &[Task]) {
        self.columns.clear();
        self.slots.clear();
        for task in tasks {
            let column = self.columns.entry(task.status()).or_default();
            let position = CardPosition {
                status: task.status(),
                index: column.len(),
            };
            column.push(task.id());
            self.slots.insert(
                task.id(),
                CardSlot {
                    committed: position,
                    pending: None,
                },
            );
        }
    }

    /// Returns the cards in a column, top to bottom.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[TaskId] {
        self.columns.get(&status).map_or(&[], Vec::as_slice)
    }

    /// Returns the card's visible position (pending move included).
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<CardPosition> {
        self.slots.get(&id).map(|slot| slot.pending.unwrap_or(slot.committed))
    }

    /// True while the card has an unconfirmed move.
    #[must_use]
    pub fn has_pending(&self, id: TaskId) -> bool {
        self.slots.get(&id).is_some_and(|slot| slot.pending.is_some())
    }

    /// Optimistically moves a card to the end of the `to` column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] for cards not on the board and
    /// [`BoardError::MoveInFlight`] when a previous move is unresolved.
    pub fn begin_move(&mut self, id: TaskId, to: TaskStatus) -> Result<(), BoardError> {
        let slot = self.slots.get(&id).ok_or(BoardError::UnknownTask(id))?;
        if slot.pending.is_some() {
            return Err(BoardError::MoveInFlight(id));
        }
        let committed = CardPosition {
            status: slot.committed.status,
            index: self.detach_card(id, slot.committed.status),
        };

        let target = self.columns.entry(to).or_default();
        let pending = CardPosition {
            status: to,
            index: target.len(),
        };
        target.push(id);
        self.slots.insert(
            id,
            CardSlot {
                committed,
                pending: Some(pending),
            },
        );
        Ok(())
    }

    /// Confirms a pending move; the optimistic position becomes
    /// committed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] for cards not on the board.
    pub fn commit_move(&mut self, id: TaskId) -> Result<(), BoardError> {
        let slot = self.slots.get_mut(&id).ok_or(BoardError::UnknownTask(id))?;
        if let Some(pending) = slot.pending.take() {
            slot.committed = pending;
        }
        Ok(())
    }

    /// Reverts a pending move, restoring the exact prior column and
    /// ordering.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] for cards not on the board.
    pub fn rollback_move(&mut self, id: TaskId) -> Result<(), BoardError> {
        let slot = self.slots.get(&id).ok_or(BoardError::UnknownTask(id))?;
        let Some(pending) = slot.pending else {
            return Ok(());
        };
        let committed = slot.committed;
        self.detach_card(id, pending.status);
        let column = self.columns.entry(committed.status).or_default();
        let index = committed.index.min(column.len());
        column.insert(index, id);
        self.slots.insert(
            id,
            CardSlot {
                committed: CardPosition {
                    status: committed.status,
                    index,
                },
                pending: None,
            },
        );
        Ok(())
    }

    /// Removes the card from a column and returns the index it held.
    fn detach_card(&mut self, id: TaskId, status: TaskStatus) -> usize {
        let column = self.columns.entry(status).or_default();
        let index = column.iter().position(|t| *t == id).unwrap_or(column.len());
        if index < column.len() {
            column.remove(index);
        }
        index
    }
}

/// Outcome of a drag-drop move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was persisted and the optimistic position kept.
    Moved(Task),
    /// Source and target columns were identical; nothing happened.
    Unchanged,
    /// The view was detached while the store call was in flight; the
    /// result was discarded silently.
    Discarded,
}

/// Keeps the board consistent with the backing store through optimistic
/// moves.
///
/// The service owns the in-memory task snapshot; only [`Self::move_card`]
/// and [`Self::refresh`] write to it. Mutations of one task are
/// serialized (a card with an unresolved move rejects further moves);
/// distinct tasks are independent.
pub struct BoardSyncService<S, N, C>
where
    S: TaskStore,
    N: NotificationStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    dispatcher: NotificationDispatcher<N, C>,
    clock: Arc<C>,
    model: BoardModel,
    tasks: HashMap<TaskId, Task>,
    detached: bool,
}

impl<S, N, C> BoardSyncService<S, N, C>
where
    S: TaskStore,
    N: NotificationStore,
    C: Clock + Send + Sync,
{
    /// Creates an empty board bound to its collaborators.
    #[must_use]
    pub fn new(store: Arc<S>, dispatcher: NotificationDispatcher<N, C>, clock: Arc<C>) -> Self {
        Self {
            store,
            dispatcher,
            clock,
            model: BoardModel::new(),
            tasks: HashMap::new(),
            detached: false,
        }
    }

    /// Refetches tasks and rebuilds the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LoadFailed`] when the store cannot be read.
    pub async fn refresh(&mut self, filter: &TaskFilter) -> Result<(), BoardError> {
        let tasks = self
            .store
            .list(filter)
            .await
            .map_err(BoardError::LoadFailed)?;
        self.model.load(&tasks);
        self.tasks = tasks.into_iter().map(|task| (task.id(), task)).collect();
        Ok(())
    }

    /// Returns the board state.
    #[must_use]
    pub const fn model(&self) -> &BoardModel {
        &self.model
    }

    /// Returns the cached task snapshot for a card.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Marks the owning view unmounted. Results of in-flight moves are
    /// discarded silently from then on; the store calls themselves are
    /// not cancelled and complete or fail independently.
    pub const fn detach(&mut self) {
        self.detached = true;
    }

    /// Moves a card to the column for `to` on behalf of `actor`.
    ///
    /// Unauthorized actors are rejected before any optimistic change or
    /// store call. Dropping a card on its own column is a no-op. On store
    /// failure the card returns to its exact prior column and position
    /// and no notification is created; the failure is surfaced once,
    /// never retried here.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Forbidden`], [`BoardError::UnknownTask`],
    /// [`BoardError::MoveInFlight`], or [`BoardError::NotSaved`].
    pub async fn move_card(
        &mut self,
        id: TaskId,
        to: TaskStatus,
        actor: UserId,
    ) -> Result<MoveOutcome, BoardError> {
        let mut task = self
            .tasks
            .get(&id)
            .cloned()
            .ok_or(BoardError::UnknownTask(id))?;
        if !policy::can_change_status(&task, actor) {
            return Err(AuthorizationError {
                actor,
                action: TaskAction::ChangeStatus,
                task: id,
            }
            .into());
        }
        if task.status() == to {
            return Ok(MoveOutcome::Unchanged);
        }

        let event = task.change_status(to, actor, &*self.clock)?;
        self.model.begin_move(id, to)?;
        let confirmation = self.store.update(&task).await;
        self.settle(task, event, confirmation).await
    }

    /// Resolves the optimistic move once the store call returns.
    async fn settle(
        &mut self,
        task: Task,
        event: Option<TaskEvent>,
        confirmation: Result<(), TaskStoreError>,
    ) -> Result<MoveOutcome, BoardError> {
        let id = task.id();
        match confirmation {
            Ok(()) => {
                self.model.commit_move(id)?;
                self.tasks.insert(id, task.clone());
                if self.detached {
                    tracing::debug!(task = %id, "move confirmed after detach; result discarded");
                    return Ok(MoveOutcome::Discarded);
                }
                if let Some(event) = event {
                    if let Err(err) = self.dispatcher.dispatch(&event, &task).await {
                        tracing::warn!(task = %id, error = %err, "notification dispatch failed");
                    }
                }
                Ok(MoveOutcome::Moved(task))
            }
            Err(source) => {
                self.model.rollback_move(id)?;
                if self.detached {
                    tracing::debug!(task = %id, "move failed after detach; result discarded");
                    return Ok(MoveOutcome::Discarded);
                }
                tracing::warn!(task = %id, error = %source, "move rejected by store; rolled back");
                Err(BoardError::NotSaved { task: id, source })
            }
        }
    }
}
