//! Task table operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Db;
use crate::error::{Error, Result};
use crate::model::{NewTask, Task, TaskUpdate};
use crate::store::TaskStore;

const TASK_COLUMNS: &str = "id, title, description, status, priority, assigned_to, created_by, due_date, created_at, updated_at";

#[async_trait]
impl TaskStore for Db {
    async fn list_all_tasks(&self) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks"))
            .fetch_all(self.pool())
            .await?;
        Ok(rows.into_iter().map(TaskRow::into_task).collect())
    }

    async fn get_task(&self, id: &str) -> Result<Task> {
        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

        row.map(TaskRow::into_task)
            .ok_or_else(|| Error::NotFound(format!("task {id}")))
    }

    async fn insert_task(&self, new: NewTask, created_by: &str) -> Result<Task> {
        new.validate()?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let row: TaskRow = sqlx::query_as(&format!(
            "INSERT INTO tasks (id, title, description, status, priority, assigned_to, created_by, due_date, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(String::from(new.status.unwrap_or_default()))
        .bind(new.priority.map(String::from))
        .bind(&new.assigned_to)
        .bind(created_by)
        .bind(new.due_date)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into_task())
    }

    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task> {
        update.validate()?;

        // Read-modify-write inside one transaction so concurrent partial
        // updates do not clobber each other.
        let mut tx = self.pool().begin().await?;
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut task = row
            .map(TaskRow::into_task)
            .ok_or_else(|| Error::NotFound(format!("task {id}")))?;

        update.apply(&mut task, Utc::now());

        sqlx::query(
            "UPDATE tasks SET title = $1, description = $2, status = $3, priority = $4, assigned_to = $5, due_date = $6, updated_at = $7
             WHERE id = $8",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_ref().map(|p| p.as_str()))
        .bind(&task.assigned_to)
        .bind(task.due_date)
        .bind(task.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(Error::NotFound(format!("task {id}")));
        }
        Ok(())
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    status: String,
    priority: Option<String>,
    assigned_to: Option<String>,
    created_by: Option<String>,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self) -> Task {
        Task {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status.into(),
            priority: self.priority.map(Into::into),
            assigned_to: self.assigned_to,
            created_by: self.created_by,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
