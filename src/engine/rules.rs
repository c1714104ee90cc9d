//! Alert predicates.
//!
//! Each task is checked against four rules in a fixed order: overdue,
//! unassigned-high-priority, stale-pending, urgent-still-pending. Every
//! match yields its own notification. Recent deletion events yield one
//! notification each.

use chrono::{DateTime, TimeDelta, Utc};

use crate::model::{DeletionEvent, Notification, NotificationKind, Task};

/// A pending task older than this many days is stale.
pub const STALE_PENDING_DAYS: i64 = 7;

/// Deletion events older than this are not reported.
pub const DELETION_WINDOW_HOURS: i64 = 24;

/// At most this many deletion events are reported.
pub const MAX_DELETION_EVENTS: usize = 10;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Inclusive lower bound of the deletion window.
pub fn deletion_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - TimeDelta::hours(DELETION_WINDOW_HOURS)
}

/// All rule matches for one task, in rule order.
pub fn task_notifications(task: &Task, now: DateTime<Utc>) -> Vec<Notification> {
    [
        overdue(task, now),
        unassigned_high_priority(task),
        stale_pending(task, now),
        urgent_still_pending(task),
    ]
    .into_iter()
    .flatten()
    .map(|kind| Notification {
        task_id: task.id.clone(),
        task_title: task.title.clone(),
        priority: task.effective_priority(),
        kind,
    })
    .collect()
}

/// Not completed and past a deadline. A deadline equal to `now` is not yet due.
fn overdue(task: &Task, now: DateTime<Utc>) -> Option<NotificationKind> {
    match task.due_date {
        Some(due_date) if !task.is_completed() && due_date < now => {
            Some(NotificationKind::Overdue { due_date })
        }
        _ => None,
    }
}

fn unassigned_high_priority(task: &Task) -> Option<NotificationKind> {
    (task.is_unassigned() && task.is_high_priority()).then_some(NotificationKind::Unassigned)
}

/// Pending for strictly longer than [`STALE_PENDING_DAYS`]. The reported
/// day count is the floor of the elapsed time.
fn stale_pending(task: &Task, now: DateTime<Utc>) -> Option<NotificationKind> {
    if !task.is_pending() {
        return None;
    }
    let elapsed = now - task.created_at;
    (elapsed > TimeDelta::days(STALE_PENDING_DAYS)).then(|| NotificationKind::StalePending {
        days: elapsed.num_milliseconds().div_euclid(MILLIS_PER_DAY),
    })
}

fn urgent_still_pending(task: &Task) -> Option<NotificationKind> {
    (task.is_high_priority() && task.is_pending()).then_some(NotificationKind::Urgent)
}

/// Alerts for deletion events inside the window, in the given order
/// (newest first from the store), capped at [`MAX_DELETION_EVENTS`].
pub fn deletion_notifications(events: &[DeletionEvent], now: DateTime<Utc>) -> Vec<Notification> {
    let since = deletion_window_start(now);
    events
        .iter()
        .filter(|e| e.deletion_timestamp >= since)
        .take(MAX_DELETION_EVENTS)
        .map(|e| Notification {
            task_id: e.task_id.clone(),
            task_title: e.task_title.clone(),
            priority: e.task_priority.clone().unwrap_or_default(),
            kind: NotificationKind::Deleted {
                event_key: e.alert_key().to_string(),
                deleted_by_email: e.deleted_by_user_email.clone(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, TaskStatus};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn task() -> Task {
        Task {
            id: "t1".to_string(),
            title: "Report".to_string(),
            description: None,
            status: TaskStatus::InProgress,
            priority: Some(Priority::Low),
            assigned_to: Some("u1".to_string()),
            created_by: None,
            due_date: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn quiet_task_has_no_alerts() {
        assert!(task_notifications(&task(), now()).is_empty());
    }

    #[test]
    fn stale_day_count_is_floored() {
        let t = Task {
            status: TaskStatus::Pending,
            created_at: now() - TimeDelta::days(9) - TimeDelta::hours(23),
            ..task()
        };
        let alerts = task_notifications(&t, now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, NotificationKind::StalePending { days: 9 });
    }

    #[test]
    fn unknown_status_matches_no_status_rule() {
        let t = Task {
            status: TaskStatus::Other("blocked".to_string()),
            priority: Some(Priority::High),
            assigned_to: Some("u1".to_string()),
            created_at: now() - TimeDelta::days(30),
            ..task()
        };
        assert!(task_notifications(&t, now()).is_empty());
    }

    #[test]
    fn missing_priority_reports_medium() {
        let t = Task {
            priority: None,
            due_date: Some(now() - TimeDelta::days(1)),
            ..task()
        };
        let alerts = task_notifications(&t, now());
        assert_eq!(alerts[0].priority, Priority::Medium);
    }

    #[test]
    fn deletion_window_is_inclusive() {
        let event = DeletionEvent {
            id: None,
            task_id: "t9".to_string(),
            task_title: "Old Task".to_string(),
            deleted_by_user_id: "u1".to_string(),
            deleted_by_user_email: "a@b.com".to_string(),
            deletion_timestamp: deletion_window_start(now()),
            task_priority: Some(Priority::Critical),
            task_status: None,
        };
        let alerts = deletion_notifications(std::slice::from_ref(&event), now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].priority, Priority::Critical);

        let older = DeletionEvent {
            deletion_timestamp: event.deletion_timestamp - TimeDelta::milliseconds(1),
            ..event
        };
        assert!(deletion_notifications(&[older], now()).is_empty());
    }
}
