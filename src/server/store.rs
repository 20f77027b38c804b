//! In-memory task store
//!
//! Tasks live for the lifetime of the process. Each task sits behind its own
//! async mutex so concurrent `tasks/send` calls on one id are serialized
//! while calls on different ids proceed independently.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::protocol::{Message, Task, TaskState};

/// Exclusive handle on one stored task
///
/// Writes through the guard are visible to every later reader. Other writers
/// on the same id wait until it is dropped.
pub type TaskGuard = OwnedMutexGuard<Task>;

/// Store lookup failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Task '{0}' not found")]
    NotFound(String),
}

/// Task records owned by one agent
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: RwLock<HashMap<String, Arc<Mutex<Task>>>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a task or append to an existing one, returning it locked
    ///
    /// An absent or unknown id creates a `submitted` task whose only message is
    /// `message` (if any); a fresh id is generated when none is given. A known id
    /// gets `message` appended and moves to `working` whatever its prior state,
    /// so completed, failed and canceled tasks can all be revived.
    pub async fn create_or_append(
        &self,
        task_id: Option<String>,
        message: Option<Message>,
    ) -> TaskGuard {
        let task_id = task_id.unwrap_or_else(|| Uuid::now_v7().to_string());

        let slot = {
            let mut tasks = self.tasks.write().await;
            match tasks.get(&task_id) {
                Some(slot) => slot.clone(),
                None => {
                    let mut task = Task::new(task_id.clone());
                    task.messages.extend(message);
                    let slot = Arc::new(Mutex::new(task));
                    tasks.insert(task_id.clone(), slot.clone());
                    debug!(task_id = %task_id, "Task created");
                    // Uncontended: nobody else can see the slot until the map lock drops
                    return slot.lock_owned().await;
                }
            }
        };

        let mut guard = slot.lock_owned().await;
        guard.messages.extend(message);
        guard.state = TaskState::Working;
        debug!(task_id = %guard.id, "Task moved to working");
        guard
    }

    /// Snapshot of a task
    pub async fn get(&self, task_id: &str) -> Result<Task, StoreError> {
        let slot = self.slot(task_id).await?;
        let task = slot.lock().await;
        Ok(task.clone())
    }

    /// Mark a task canceled; canceling twice succeeds both times
    pub async fn cancel(&self, task_id: &str) -> Result<Task, StoreError> {
        let slot = self.slot(task_id).await?;
        let mut task = slot.lock().await;
        task.state = TaskState::Canceled;
        debug!(task_id = %task_id, "Task canceled");
        Ok(task.clone())
    }

    /// Number of stored tasks
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    async fn slot(&self, task_id: &str) -> Result<Arc<Mutex<Task>>, StoreError> {
        self.tasks
            .read()
            .await
            .get(task_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(task_id.to_string()))
    }
}
