//! In-memory store, for tests and running without Postgres.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DeletionLog, TaskStore};
use crate::error::{Error, Result};
use crate::model::{DeletionEvent, NewDeletionEvent, NewTask, Task, TaskUpdate};

/// Both tables behind mutexes. Tasks keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
    deletions: Mutex<Vec<DeletionEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-built tasks as-is, keeping their timestamps.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            deletions: Mutex::new(Vec::new()),
        }
    }

    pub fn seed_task(&self, task: Task) {
        self.tasks().push(task);
    }

    /// Append a deletion event with its own timestamp.
    pub fn seed_deletion(&self, event: DeletionEvent) {
        self.deletions().push(event);
    }

    pub fn deletion_count(&self) -> usize {
        self.deletions().len()
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn deletions(&self) -> MutexGuard<'_, Vec<DeletionEvent>> {
        self.deletions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_all_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks().clone())
    }

    async fn get_task(&self, id: &str) -> Result<Task> {
        self.tasks()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("task {id}")))
    }

    async fn insert_task(&self, new: NewTask, created_by: &str) -> Result<Task> {
        new.validate()?;
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            status: new.status.unwrap_or_default(),
            priority: new.priority,
            assigned_to: new.assigned_to,
            created_by: Some(created_by.to_string()),
            due_date: new.due_date,
            created_at: now,
            updated_at: now,
        };
        self.tasks().push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task> {
        update.validate()?;
        let mut tasks = self.tasks();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("task {id}")))?;
        update.apply(task, Utc::now());
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        let mut tasks = self.tasks();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(Error::NotFound(format!("task {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl DeletionLog for MemoryStore {
    async fn insert_deletion(&self, event: NewDeletionEvent) -> Result<DeletionEvent> {
        let event = event.into_event(Some(Uuid::new_v4().to_string()), Utc::now());
        self.deletions().push(event.clone());
        Ok(event)
    }

    async fn query_recent(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<DeletionEvent>> {
        let mut recent: Vec<DeletionEvent> = self
            .deletions()
            .iter()
            .filter(|e| e.deletion_timestamp >= since)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.deletion_timestamp.cmp(&a.deletion_timestamp));
        recent.truncate(limit);
        Ok(recent)
    }
}
