//! Deletion logger.
//!
//! Logging a deletion is advisory. Bad input is rejected before any write,
//! but once input is valid the call succeeds whether or not the insert did.

use tracing::{error, info};

use crate::error::Result;
use crate::model::NewDeletionEvent;
use crate::store::DeletionLog;
use crate::telemetry::metrics;

/// Validate and record a deletion event.
///
/// # Errors
///
/// [`crate::error::Error::Validation`] when a required field is missing or
/// blank. Store failures are logged and swallowed.
pub async fn log_deletion(log: &dyn DeletionLog, event: NewDeletionEvent) -> Result<()> {
    event.validate()?;

    let task_id = event.task_id.clone();
    match log.insert_deletion(event).await {
        Ok(stored) => info!(task_id = %task_id, event_id = ?stored.id, "task deletion logged"),
        Err(e) => {
            error!(task_id = %task_id, "failed to write deletion log: {e}");
            metrics::deletion_log_failures().add(1, &[]);
        }
    }
    Ok(())
}
