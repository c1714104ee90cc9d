//! Deletion audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::identity::RequestContext;
use crate::model::task::{Priority, Task, TaskStatus};

/// An audit record written when a task is removed. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionEvent {
    /// Store-assigned id. Older rows may not carry one.
    pub id: Option<String>,
    pub task_id: String,
    pub task_title: String,
    pub deleted_by_user_id: String,
    pub deleted_by_user_email: String,
    pub deletion_timestamp: DateTime<Utc>,
    /// Snapshot of the task's priority at delete time.
    pub task_priority: Option<Priority>,
    /// Snapshot of the task's status at delete time.
    pub task_status: Option<TaskStatus>,
}

impl DeletionEvent {
    /// Identity used for the derived alert: the event id, else the task id.
    /// An empty id counts as absent.
    pub fn alert_key(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.task_id)
    }
}

/// Input for the deletion logger. Missing fields deserialize as empty and
/// are rejected by [`NewDeletionEvent::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDeletionEvent {
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub task_title: String,
    #[serde(default)]
    pub deleted_by_user_id: String,
    #[serde(default)]
    pub deleted_by_user_email: String,
    pub task_priority: Option<Priority>,
    pub task_status: Option<TaskStatus>,
}

impl NewDeletionEvent {
    /// Snapshot a task that `ctx` is about to delete.
    pub fn for_task(task: &Task, ctx: &RequestContext) -> Self {
        Self {
            task_id: task.id.clone(),
            task_title: task.title.clone(),
            deleted_by_user_id: ctx.user_id.clone(),
            deleted_by_user_email: ctx.email.clone().unwrap_or_default(),
            task_priority: task.priority.clone(),
            task_status: Some(task.status.clone()),
        }
    }

    /// All four identifying fields must be present and non-blank.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("task_id", &self.task_id),
            ("task_title", &self.task_title),
            ("deleted_by_user_id", &self.deleted_by_user_id),
            ("deleted_by_user_email", &self.deleted_by_user_email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// Materialise the stored record.
    pub fn into_event(self, id: Option<String>, at: DateTime<Utc>) -> DeletionEvent {
        DeletionEvent {
            id,
            task_id: self.task_id,
            task_title: self.task_title,
            deleted_by_user_id: self.deleted_by_user_id,
            deleted_by_user_email: self.deleted_by_user_email,
            deletion_timestamp: at,
            task_priority: self.task_priority,
            task_status: self.task_status,
        }
    }
}
