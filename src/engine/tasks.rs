//! Identity-scoped task operations.
//!
//! Every operation takes the caller's [`RequestContext`] explicitly and
//! performs its authorization check before touching the store.

use std::sync::Arc;

use tracing::{info, warn};

use super::audit::log_deletion;
use crate::error::{Error, Result};
use crate::model::{NewDeletionEvent, NewTask, RequestContext, Task, TaskFilter, TaskUpdate};
use crate::retry::{RetryPolicy, retry};
use crate::store::{DeletionLog, TaskStore};

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    deletions: Arc<dyn DeletionLog>,
    retry: RetryPolicy,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>, deletions: Arc<dyn DeletionLog>, retry: RetryPolicy) -> Self {
        Self {
            tasks,
            deletions,
            retry,
        }
    }

    /// Tasks visible to the caller that match `filter`, in store order.
    pub async fn list(&self, ctx: &RequestContext, filter: &TaskFilter) -> Result<Vec<Task>> {
        let tasks = retry(&self.retry, "tasks.list_all", || self.tasks.list_all_tasks()).await?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.visible_to(ctx) && filter.matches(t))
            .collect())
    }

    pub async fn get(&self, ctx: &RequestContext, id: &str) -> Result<Task> {
        let task = retry(&self.retry, "tasks.get", || self.tasks.get_task(id)).await?;
        if !task.visible_to(ctx) {
            return Err(Error::Forbidden(format!("task {id} is not visible to this user")));
        }
        Ok(task)
    }

    /// Any authenticated caller may create a task; they become its creator.
    pub async fn create(&self, ctx: &RequestContext, new: NewTask) -> Result<Task> {
        new.validate()?;
        let task = self.tasks.insert_task(new, &ctx.user_id).await?;
        info!(task_id = %task.id, created_by = %ctx.user_id, "task created");
        Ok(task)
    }

    /// Admins may change anything. Users may only move the status of tasks
    /// assigned to them.
    pub async fn update(&self, ctx: &RequestContext, id: &str, update: TaskUpdate) -> Result<Task> {
        update.validate()?;
        if !ctx.is_admin() {
            let task = retry(&self.retry, "tasks.get", || self.tasks.get_task(id)).await?;
            if task.assigned_to.as_deref() != Some(ctx.user_id.as_str()) {
                return Err(Error::Forbidden(format!("task {id} is not assigned to this user")));
            }
            if !update.is_status_only() {
                return Err(Error::Forbidden("users may only change task status".to_string()));
            }
        }
        let task = self.tasks.update_task(id, update).await?;
        info!(task_id = %task.id, status = %task.status, "task updated");
        Ok(task)
    }

    /// Admin only. The caller must carry an email so the deletion can be
    /// audited; the task is left in place otherwise. The audit record is
    /// written afterwards and a failure to write it never fails the deletion.
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<()> {
        ctx.require_admin()?;
        let task = retry(&self.retry, "tasks.get", || self.tasks.get_task(id)).await?;
        let event = NewDeletionEvent::for_task(&task, ctx);
        event.validate()?;

        self.tasks.delete_task(id).await?;
        info!(task_id = %id, deleted_by = %ctx.user_id, "task deleted");

        if let Err(e) = log_deletion(self.deletions.as_ref(), event).await {
            warn!(task_id = %id, "deletion not recorded: {e}");
        }
        Ok(())
    }
}
