//! Derived alerts. Produced fresh per request, never persisted.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::model::task::Priority;

/// An alert about one task.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub task_id: String,
    pub task_title: String,
    pub priority: Priority,
    pub kind: NotificationKind,
}

/// What triggered the alert, with the data only that trigger carries.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationKind {
    Overdue { due_date: DateTime<Utc> },
    Unassigned,
    StalePending { days: i64 },
    Urgent,
    Deleted { event_key: String, deleted_by_email: String },
}

impl NotificationKind {
    /// Wire discriminant. Deletions are reported as `urgent`.
    pub fn wire_type(&self) -> &'static str {
        match self {
            NotificationKind::Overdue { .. } => "overdue",
            NotificationKind::Unassigned => "unassigned",
            NotificationKind::StalePending { .. } => "pending",
            NotificationKind::Urgent | NotificationKind::Deleted { .. } => "urgent",
        }
    }

    fn id_prefix(&self) -> &'static str {
        match self {
            NotificationKind::Deleted { .. } => "deletion",
            other => other.wire_type(),
        }
    }
}

impl Notification {
    /// `<kind>-<task_id>`, or `deletion-<event id>` for deletions.
    pub fn id(&self) -> String {
        match &self.kind {
            NotificationKind::Deleted { event_key, .. } => format!("deletion-{event_key}"),
            kind => format!("{}-{}", kind.id_prefix(), self.task_id),
        }
    }

    pub fn title(&self) -> String {
        let label = match self.kind {
            NotificationKind::Overdue { .. } => "Overdue",
            NotificationKind::Unassigned => "Unassigned",
            NotificationKind::StalePending { .. } => "Pending",
            NotificationKind::Urgent => "Urgent",
            NotificationKind::Deleted { .. } => "Task Deleted",
        };
        format!("{label}: {}", self.task_title)
    }

    pub fn description(&self) -> String {
        match &self.kind {
            NotificationKind::Overdue { due_date } => {
                format!("Task is overdue since {}", due_date.format("%Y-%m-%d"))
            }
            NotificationKind::Unassigned => "High-priority task needs to be assigned".to_string(),
            NotificationKind::StalePending { days } => {
                format!("Task has been pending for {days} days")
            }
            NotificationKind::Urgent => "High-priority task is still pending".to_string(),
            NotificationKind::Deleted {
                deleted_by_email, ..
            } => format!("Deleted by {deleted_by_email}"),
        }
    }
}

#[derive(Serialize)]
struct NotificationWire<'a> {
    id: String,
    #[serde(rename = "type")]
    kind: &'static str,
    title: String,
    description: String,
    #[serde(rename = "taskId")]
    task_id: &'a str,
    priority: &'a str,
}

impl Serialize for Notification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NotificationWire {
            id: self.id(),
            kind: self.kind.wire_type(),
            title: self.title(),
            description: self.description(),
            task_id: &self.task_id,
            priority: self.priority.as_str(),
        }
        .serialize(serializer)
    }
}
