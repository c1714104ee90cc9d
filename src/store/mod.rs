//! Store seams: the task table and the deletion audit log.
//!
//! The Postgres implementations live in [`crate::db`]; [`memory::MemoryStore`]
//! backs tests and local demos.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{DeletionEvent, NewDeletionEvent, NewTask, Task, TaskUpdate};

pub use memory::MemoryStore;

/// CRUD access to tasks. No filtering is pushed down.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Every task, in store order.
    async fn list_all_tasks(&self) -> Result<Vec<Task>>;

    /// Fails with [`crate::error::Error::NotFound`] when absent.
    async fn get_task(&self, id: &str) -> Result<Task>;

    async fn insert_task(&self, new: NewTask, created_by: &str) -> Result<Task>;

    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task>;

    async fn delete_task(&self, id: &str) -> Result<()>;
}

/// Append-only deletion audit log.
#[async_trait]
pub trait DeletionLog: Send + Sync {
    async fn insert_deletion(&self, event: NewDeletionEvent) -> Result<DeletionEvent>;

    /// Events at or after `since`, newest first, at most `limit`.
    async fn query_recent(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<DeletionEvent>>;
}
