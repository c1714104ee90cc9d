//! HTTP tests: a real server on a random port, driven with reqwest.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};
use taskdesk::api::{AppState, router};
use taskdesk::error::{Error, Result};
use taskdesk::model::*;
use taskdesk::retry::RetryPolicy;
use taskdesk::store::{DeletionLog, MemoryStore, TaskStore};

async fn spawn_app(tasks: Arc<dyn TaskStore>, deletions: Arc<dyn DeletionLog>) -> String {
    let state = AppState::new(tasks, deletions, RetryPolicy::no_retry());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_memory_app() -> (String, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let base = spawn_app(store.clone(), store.clone()).await;
    (base, store)
}

fn as_admin(req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req.header("x-user-id", "admin-1")
        .header("x-user-role", "admin")
        .header("x-user-email", "admin@example.com")
}

fn as_user(req: reqwest::RequestBuilder, user: &str) -> reqwest::RequestBuilder {
    req.header("x-user-id", user).header("x-user-role", "user")
}

fn seeded_task(id: &str) -> Task {
    let now = Utc::now();
    Task {
        id: id.to_string(),
        title: format!("Task {id}"),
        description: None,
        status: TaskStatus::Pending,
        priority: Some(Priority::High),
        assigned_to: None,
        created_by: Some("admin-1".to_string()),
        due_date: None,
        created_at: now - TimeDelta::days(10),
        updated_at: now,
    }
}

struct DownTasks;

#[async_trait]
impl TaskStore for DownTasks {
    async fn list_all_tasks(&self) -> Result<Vec<Task>> {
        Err(Error::StoreUnavailable("connection refused".to_string()))
    }

    async fn get_task(&self, _id: &str) -> Result<Task> {
        Err(Error::StoreUnavailable("connection refused".to_string()))
    }

    async fn insert_task(&self, _new: NewTask, _created_by: &str) -> Result<Task> {
        Err(Error::StoreUnavailable("connection refused".to_string()))
    }

    async fn update_task(&self, _id: &str, _update: TaskUpdate) -> Result<Task> {
        Err(Error::StoreUnavailable("connection refused".to_string()))
    }

    async fn delete_task(&self, _id: &str) -> Result<()> {
        Err(Error::StoreUnavailable("connection refused".to_string()))
    }
}

// ---------------------------------------------------------------------------
// /notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notifications_returns_list_and_count() {
    let (base, store) = spawn_memory_app().await;
    store.seed_task(seeded_task("t1"));

    let client = reqwest::Client::new();
    let res = as_admin(client.get(format!("{base}/notifications")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["notifications"][0]["id"], "urgent-t1");
    assert_eq!(body["notifications"][0]["type"], "urgent");
    assert_eq!(body["notifications"][0]["taskId"], "t1");
    assert_eq!(body["notifications"][0]["priority"], "high");
}

#[tokio::test]
async fn notifications_empty_store_is_ok() {
    let (base, _store) = spawn_memory_app().await;
    let res = as_admin(reqwest::Client::new().get(format!("{base}/notifications")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "notifications": [], "count": 0 }));
}

#[tokio::test]
async fn notifications_task_store_down_is_500() {
    let base = spawn_app(Arc::new(DownTasks), Arc::new(MemoryStore::new())).await;
    let res = as_admin(reqwest::Client::new().get(format!("{base}/notifications")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn notifications_require_identity_and_admin_role() {
    let (base, _store) = spawn_memory_app().await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{base}/notifications")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = as_user(client.get(format!("{base}/notifications")), "u1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// /tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_fetch_task() {
    let (base, _store) = spawn_memory_app().await;
    let client = reqwest::Client::new();

    let res = as_admin(client.post(format!("{base}/tasks")))
        .json(&json!({ "title": "Write report", "priority": "high", "assigned_to": "u1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["status"], "pending");
    assert_eq!(created["created_by"], "admin-1");
    let id = created["id"].as_str().unwrap().to_string();

    let res = as_user(client.get(format!("{base}/tasks/{id}")), "u1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched["title"], "Write report");

    let res = as_user(client.get(format!("{base}/tasks/{id}")), "u2")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn blank_title_is_400() {
    let (base, _store) = spawn_memory_app().await;
    let res = as_admin(reqwest::Client::new().post(format!("{base}/tasks")))
        .json(&json!({ "title": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_tasks_applies_query_filters() {
    let (base, store) = spawn_memory_app().await;
    store.seed_task(seeded_task("t1"));
    store.seed_task(Task {
        status: TaskStatus::Completed,
        ..seeded_task("t2")
    });

    let res = as_admin(reqwest::Client::new().get(format!("{base}/tasks?status=completed")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["tasks"][0]["id"], "t2");
}

#[tokio::test]
async fn patch_updates_status() {
    let (base, store) = spawn_memory_app().await;
    store.seed_task(seeded_task("t1"));

    let res = as_admin(reqwest::Client::new().patch(format!("{base}/tasks/t1")))
        .json(&json!({ "status": "in-progress", "assigned_to": "u7" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "in-progress");
    assert_eq!(body["assigned_to"], "u7");
}

#[tokio::test]
async fn delete_task_then_alert_shows_up() {
    let (base, store) = spawn_memory_app().await;
    store.seed_task(Task {
        status: TaskStatus::Completed,
        ..seeded_task("t5")
    });
    let client = reqwest::Client::new();

    let res = as_admin(client.delete(format!("{base}/tasks/t5")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = as_admin(client.delete(format!("{base}/tasks/t5")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = as_admin(client.get(format!("{base}/notifications")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["notifications"][0]["title"], "Task Deleted: Task t5");
    assert_eq!(
        body["notifications"][0]["description"],
        "Deleted by admin@example.com"
    );
}

#[tokio::test]
async fn delete_without_email_header_is_400_and_keeps_task() {
    let (base, store) = spawn_memory_app().await;
    store.seed_task(seeded_task("t6"));
    let client = reqwest::Client::new();

    let res = client
        .delete(format!("{base}/tasks/t6"))
        .header("x-user-id", "admin-1")
        .header("x-user-role", "admin")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(store.get_task("t6").await.is_ok());
    assert_eq!(store.deletion_count(), 0);
}

// ---------------------------------------------------------------------------
// /deletion-logs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deletion_log_validates_input() {
    let (base, store) = spawn_memory_app().await;
    let client = reqwest::Client::new();

    let res = as_admin(client.post(format!("{base}/deletion-logs")))
        .json(&json!({ "task_id": "t1", "task_title": "Report" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.deletion_count(), 0);

    let res = as_admin(client.post(format!("{base}/deletion-logs")))
        .json(&json!({
            "task_id": "t1",
            "task_title": "Report",
            "deleted_by_user_id": "admin-1",
            "deleted_by_user_email": "admin@example.com",
            "task_priority": "low",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(store.deletion_count(), 1);
}

#[tokio::test]
async fn health_is_open() {
    let (base, _store) = spawn_memory_app().await;
    let res = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
