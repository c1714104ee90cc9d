//! Deletion audit log operations. Rows are only ever inserted and read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Db;
use crate::error::Result;
use crate::model::{DeletionEvent, NewDeletionEvent};
use crate::store::DeletionLog;

#[async_trait]
impl DeletionLog for Db {
    async fn insert_deletion(&self, event: NewDeletionEvent) -> Result<DeletionEvent> {
        let row: DeletionRow = sqlx::query_as(
            "INSERT INTO task_deletion_logs (id, task_id, task_title, deleted_by_user_id, deleted_by_user_email, deletion_timestamp, task_priority, task_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, task_id, task_title, deleted_by_user_id, deleted_by_user_email, deletion_timestamp, task_priority, task_status",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&event.task_id)
        .bind(&event.task_title)
        .bind(&event.deleted_by_user_id)
        .bind(&event.deleted_by_user_email)
        .bind(Utc::now())
        .bind(event.task_priority.map(String::from))
        .bind(event.task_status.map(String::from))
        .fetch_one(self.pool())
        .await?;

        Ok(row.into_event())
    }

    async fn query_recent(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<DeletionEvent>> {
        let rows: Vec<DeletionRow> = sqlx::query_as(
            "SELECT id, task_id, task_title, deleted_by_user_id, deleted_by_user_email, deletion_timestamp, task_priority, task_status
             FROM task_deletion_logs
             WHERE deletion_timestamp >= $1
             ORDER BY deletion_timestamp DESC
             LIMIT $2",
        )
        .bind(since)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(DeletionRow::into_event).collect())
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct DeletionRow {
    id: Option<String>,
    task_id: String,
    task_title: String,
    deleted_by_user_id: String,
    deleted_by_user_email: String,
    deletion_timestamp: DateTime<Utc>,
    task_priority: Option<String>,
    task_status: Option<String>,
}

impl DeletionRow {
    fn into_event(self) -> DeletionEvent {
        DeletionEvent {
            id: self.id,
            task_id: self.task_id,
            task_title: self.task_title,
            deleted_by_user_id: self.deleted_by_user_id,
            deleted_by_user_email: self.deleted_by_user_email,
            deletion_timestamp: self.deletion_timestamp,
            task_priority: self.task_priority.map(Into::into),
            task_status: self.task_status.map(Into::into),
        }
    }
}
