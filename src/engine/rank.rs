//! Merge, dedupe and rank.
//!
//! Deletion alerts go in front of rule alerts. The merged list is then
//! collapsed to one entry per task: a later entry for the same task replaces
//! the earlier one in the earlier one's position. So a rule alert for a task
//! that also has a deletion alert takes over the deletion alert's slot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::rules::{deletion_notifications, task_notifications};
use crate::model::{DeletionEvent, Notification, Task};

/// Maximum notifications returned.
pub const MAX_NOTIFICATIONS: usize = 10;

/// Derive the ranked alert list from a task snapshot and recent deletions.
///
/// Pure: the same inputs always give the same ordered output.
pub fn compute_notifications(
    tasks: &[Task],
    deletions: &[DeletionEvent],
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let mut merged = deletion_notifications(deletions, now);
    merged.extend(tasks.iter().flat_map(|task| task_notifications(task, now)));

    let mut ranked = dedupe_by_task(merged);
    ranked.truncate(MAX_NOTIFICATIONS);
    ranked
}

/// Keep one notification per task id. On collision the later notification
/// overwrites the earlier one in place.
pub fn dedupe_by_task(notifications: Vec<Notification>) -> Vec<Notification> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Notification> = Vec::with_capacity(notifications.len());

    for n in notifications {
        match slots.get(&n.task_id) {
            Some(&slot) => out[slot] = n,
            None => {
                slots.insert(n.task_id.clone(), out.len());
                out.push(n);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NotificationKind, Priority};

    fn alert(task_id: &str, kind: NotificationKind) -> Notification {
        Notification {
            task_id: task_id.to_string(),
            task_title: task_id.to_uppercase(),
            priority: Priority::Medium,
            kind,
        }
    }

    #[test]
    fn later_entry_takes_first_slot() {
        let list = vec![
            alert("a", NotificationKind::Unassigned),
            alert("b", NotificationKind::Unassigned),
            alert("a", NotificationKind::Urgent),
        ];
        let out = dedupe_by_task(list);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].task_id, "a");
        assert_eq!(out[0].kind, NotificationKind::Urgent);
        assert_eq!(out[1].task_id, "b");
    }

    #[test]
    fn empty_inputs_give_empty_output() {
        assert!(compute_notifications(&[], &[], Utc::now()).is_empty());
    }
}
