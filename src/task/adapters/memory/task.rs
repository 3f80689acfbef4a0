//! In-memory task store for workflow tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::domain::{EffortLogEntry, Task, TaskId};
use crate::task::ports::{TaskFilter, TaskStore, TaskStoreError, TaskStoreResult};
use mockable::DefaultClock;

/// Thread-safe in-memory task store.
///
/// Deleting a task drops its assignments and effort ledger with it, since
/// both live inside the aggregate; cascade semantics hold by
/// construction.
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned(err: impl std::fmt::Display) -> TaskStoreError {
        TaskStoreError::transport(std::io::Error::other(err.to_string()))
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list(&self, filter: &TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let state = self.state.read().map_err(Self::lock_poisoned)?;
        let mut tasks: Vec<Task> = state
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        tasks.sort_by_key(Task::created_at);
        Ok(tasks)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.state.read().map_err(Self::lock_poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn store(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(Self::lock_poisoned)?;
        if state.contains_key(&task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(Self::lock_poisoned)?;
        if !state.contains_key(&task.id()) {
            return Err(TaskStoreError::NotFound(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(Self::lock_poisoned)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskStoreError::NotFound(id))
    }

    async fn log_effort(&self, id: TaskId, entry: EffortLogEntry) -> TaskStoreResult<Task> {
        let mut state = self.state.write().map_err(Self::lock_poisoned)?;
        let task = state.get_mut(&id).ok_or(TaskStoreError::NotFound(id))?;
        task.append_effort(entry, &DefaultClock)
            .map_err(|err| TaskStoreError::Rejected(err.to_string()))?;
        Ok(task.clone())
    }
}
