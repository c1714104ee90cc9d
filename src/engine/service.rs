//! Notification service: snapshot both stores, then run the pure engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use tracing::{Instrument, error, warn};

use super::rank::compute_notifications;
use super::rules::{MAX_DELETION_EVENTS, deletion_window_start};
use crate::error::{Error, Result};
use crate::model::Notification;
use crate::retry::{RetryPolicy, retry};
use crate::store::{DeletionLog, TaskStore};
use crate::telemetry::metrics;
use crate::telemetry::request::{record_notification_counts, start_notification_span};

/// Reads tasks and recent deletions and derives alerts. Holds no state
/// between calls.
#[derive(Clone)]
pub struct NotificationService {
    tasks: Arc<dyn TaskStore>,
    deletions: Arc<dyn DeletionLog>,
    retry: RetryPolicy,
}

impl NotificationService {
    pub fn new(tasks: Arc<dyn TaskStore>, deletions: Arc<dyn DeletionLog>, retry: RetryPolicy) -> Self {
        Self {
            tasks,
            deletions,
            retry,
        }
    }

    /// Current alerts as of `now`.
    ///
    /// # Errors
    ///
    /// [`Error::StoreUnavailable`] if the task store cannot be read after
    /// retries. A failing deletion log is not an error: it is treated as
    /// holding no recent events.
    pub async fn notifications(&self, now: DateTime<Utc>) -> Result<Vec<Notification>> {
        let span = start_notification_span();

        async {
            let since = deletion_window_start(now);
            let (tasks, deletions) = tokio::join!(
                retry(&self.retry, "tasks.list_all", || self.tasks.list_all_tasks()),
                retry(&self.retry, "deletions.query_recent", || {
                    self.deletions.query_recent(since, MAX_DELETION_EVENTS)
                }),
            );

            let tasks = tasks.map_err(|e| {
                error!("task store read failed: {e}");
                Error::StoreUnavailable(e.to_string())
            })?;

            let deletions = deletions.unwrap_or_else(|e| {
                warn!("deletion log unavailable, continuing without deletion alerts: {e}");
                metrics::degraded_reads().add(1, &[KeyValue::new("source", "task_deletion_logs")]);
                Vec::new()
            });

            let notifications = compute_notifications(&tasks, &deletions, now);

            record_notification_counts(&span, tasks.len(), deletions.len(), notifications.len());
            let emitted = metrics::notifications_emitted();
            for n in &notifications {
                emitted.add(1, &[KeyValue::new("type", n.kind.wire_type())]);
            }

            Ok(notifications)
        }
        .instrument(span.clone())
        .await
    }
}
