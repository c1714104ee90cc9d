//! Core data model.
//!
//! A task is something that needs doing. It has a status, an optional priority,
//! an optional assignee and deadline. Deletion events are the audit trail left
//! behind when tasks are removed. Notifications are derived from both and never
//! stored.

pub mod deletion;
pub mod identity;
pub mod notification;
pub mod task;

pub use deletion::{DeletionEvent, NewDeletionEvent};
pub use identity::{RequestContext, Role};
pub use notification::{Notification, NotificationKind};
pub use task::{NewTask, Priority, Task, TaskFilter, TaskStatus, TaskUpdate};
