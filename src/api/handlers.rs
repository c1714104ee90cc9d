//! Route handlers. Each one authorizes the caller, then delegates to a
//! service.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};

use super::AppState;
use super::error::ApiError;
use crate::engine::log_deletion;
use crate::model::{
    NewDeletionEvent, NewTask, Notification, RequestContext, Task, TaskFilter, TaskUpdate,
};

type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
    pub count: usize,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn notifications(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Json<NotificationsResponse>> {
    ctx.require_admin()?;
    let notifications = state.notifications.notifications(Utc::now()).await?;
    Ok(Json(NotificationsResponse {
        count: notifications.len(),
        notifications,
    }))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<TasksResponse>> {
    let tasks = state.tasks.list(&ctx, &filter).await?;
    Ok(Json(TasksResponse {
        count: tasks.len(),
        tasks,
    }))
}

pub async fn get_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.tasks.get(&ctx, &id).await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(new): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.tasks.create(&ctx, new).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(update): Json<TaskUpdate>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.tasks.update(&ctx, &id, update).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.tasks.delete(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a deletion performed elsewhere. Succeeds once the input is valid.
pub async fn record_deletion(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Json(event): Json<NewDeletionEvent>,
) -> ApiResult<Json<Value>> {
    log_deletion(state.deletions.as_ref(), event).await?;
    Ok(Json(json!({ "success": true })))
}
