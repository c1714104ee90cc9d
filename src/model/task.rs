//! Task types: the task record, its status/priority vocabularies, and the
//! input shapes used to create, update and search tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::model::identity::RequestContext;

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A unit of work tracked by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique identifier. Immutable once created.
    pub id: String,

    pub title: String,

    pub description: Option<String>,

    pub status: TaskStatus,

    /// None means the task was never prioritised; alerts treat it as medium.
    pub priority: Option<Priority>,

    /// User the task is assigned to. None means unassigned.
    pub assigned_to: Option<String>,

    /// User who created the task.
    pub created_by: Option<String>,

    /// Deadline. None means no deadline.
    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == Some(Priority::High)
    }

    /// A blank assignee counts as unassigned.
    pub fn is_unassigned(&self) -> bool {
        self.assigned_to
            .as_deref()
            .is_none_or(|user| user.trim().is_empty())
    }

    /// Priority reported on alerts.
    pub fn effective_priority(&self) -> Priority {
        self.priority.clone().unwrap_or_default()
    }

    /// Admins see every task; users see tasks assigned to or created by them.
    pub fn visible_to(&self, ctx: &RequestContext) -> bool {
        ctx.is_admin()
            || self.assigned_to.as_deref() == Some(ctx.user_id.as_str())
            || self.created_by.as_deref() == Some(ctx.user_id.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a task.
///
/// The set is open: values written by other clients are kept verbatim in
/// `Other` and never match a status rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    OnHold,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::OnHold => "on-hold",
            TaskStatus::Other(s) => s,
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => TaskStatus::Pending,
            "in-progress" | "in_progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            "on-hold" | "on_hold" => TaskStatus::OnHold,
            other => TaskStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        TaskStatus::from(s.as_str())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Task priority. Open set, like [`TaskStatus`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
            Priority::Other(s) => s,
        }
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        match s {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            "critical" => Priority::Critical,
            other => Priority::Other(other.to_string()),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::from(s.as_str())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Parameters for creating a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn assigned_to(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_to = Some(user_id.into());
        self
    }

    pub fn due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)
    }
}

/// Partial update of a task. Nullable columns use a nested option so that
/// "clear the value" (`Some(None)`) differs from "leave it" (`None`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub priority: Option<Option<Priority>>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_to: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// True when nothing but the status is touched.
    pub fn is_status_only(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
            && self.due_date.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }

    /// Apply the update to a task in place, bumping `updated_at`.
    pub fn apply(self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        task.updated_at = now;
    }
}

fn nullable<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        Err(Error::Validation("title must not be empty".to_string()))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// In-process task search, applied after a full read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Case-insensitive text matched against title and description.
    pub q: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.as_ref().is_some_and(|s| *s != task.status) {
            return false;
        }
        if self
            .priority
            .as_ref()
            .is_some_and(|p| task.priority.as_ref() != Some(p))
        {
            return false;
        }
        if self
            .assigned_to
            .as_deref()
            .is_some_and(|user| task.assigned_to.as_deref() != Some(user))
        {
            return false;
        }
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let needle = q.to_lowercase();
                task.title.to_lowercase().contains(&needle)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: "t1".to_string(),
            title: title.to_string(),
            description: Some("Quarterly numbers".to_string()),
            status: TaskStatus::Pending,
            priority: Some(Priority::High),
            assigned_to: Some("u1".to_string()),
            created_by: Some("admin".to_string()),
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status: TaskStatus = serde_json::from_str("\"blocked\"").unwrap();
        assert_eq!(status, TaskStatus::Other("blocked".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"blocked\"");
    }

    #[test]
    fn defaults_are_pending_and_medium() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn underscore_status_spelling_is_accepted() {
        assert_eq!(TaskStatus::from("in_progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from("on_hold"), TaskStatus::OnHold);
        assert_eq!(TaskStatus::InProgress.to_string(), "in-progress");
    }

    #[test]
    fn blank_assignee_is_unassigned() {
        let mut t = task("Report");
        t.assigned_to = Some("  ".to_string());
        assert!(t.is_unassigned());
        t.assigned_to = None;
        assert!(t.is_unassigned());
    }

    #[test]
    fn filter_matches_text_case_insensitively() {
        let t = task("Write Report");
        let filter = TaskFilter {
            q: Some("report".to_string()),
            ..TaskFilter::default()
        };
        assert!(filter.matches(&t));

        let filter = TaskFilter {
            q: Some("quarterly".to_string()),
            ..TaskFilter::default()
        };
        assert!(filter.matches(&t));

        let filter = TaskFilter {
            q: Some("invoice".to_string()),
            ..TaskFilter::default()
        };
        assert!(!filter.matches(&t));
    }

    #[test]
    fn filter_on_status_and_priority() {
        let t = task("Report");
        let filter = TaskFilter {
            status: Some(TaskStatus::Completed),
            ..TaskFilter::default()
        };
        assert!(!filter.matches(&t));

        let filter = TaskFilter {
            status: Some(TaskStatus::Pending),
            priority: Some(Priority::High),
            ..TaskFilter::default()
        };
        assert!(filter.matches(&t));
    }

    #[test]
    fn update_distinguishes_clear_from_absent() {
        let update: TaskUpdate = serde_json::from_str(r#"{"assigned_to": null}"#).unwrap();
        assert_eq!(update.assigned_to, Some(None));
        assert!(update.due_date.is_none());

        let mut t = task("Report");
        update.apply(&mut t, Utc::now());
        assert!(t.assigned_to.is_none());
    }

    #[test]
    fn empty_title_is_rejected() {
        assert!(NewTask::new("   ").validate().is_err());
        assert!(NewTask::new("Ship it").validate().is_ok());
    }
}
