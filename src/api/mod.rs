//! HTTP surface.
//!
//! # Endpoints
//!
//! - `GET /health`
//! - `GET /notifications` (admin)
//! - `GET /tasks`, `POST /tasks`
//! - `GET /tasks/{id}`, `PATCH /tasks/{id}`, `DELETE /tasks/{id}` (delete: admin)
//! - `POST /deletion-logs`
//!
//! Callers identify themselves with the headers in [`identity`].

pub mod error;
pub mod handlers;
pub mod identity;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use opentelemetry::KeyValue;
use opentelemetry_semantic_conventions::attribute::{HTTP_RESPONSE_STATUS_CODE, HTTP_ROUTE};
use tracing::Instrument;

use crate::engine::{NotificationService, TaskService};
use crate::retry::RetryPolicy;
use crate::store::{DeletionLog, TaskStore};
use crate::telemetry::metrics;
use crate::telemetry::request::{record_status, start_request_span};

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub notifications: NotificationService,
    pub tasks: TaskService,
    pub deletions: Arc<dyn DeletionLog>,
}

impl AppState {
    pub fn new(tasks: Arc<dyn TaskStore>, deletions: Arc<dyn DeletionLog>, retry: RetryPolicy) -> Self {
        Self {
            notifications: NotificationService::new(
                Arc::clone(&tasks),
                Arc::clone(&deletions),
                retry.clone(),
            ),
            tasks: TaskService::new(tasks, Arc::clone(&deletions), retry),
            deletions,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/notifications", get(handlers::notifications))
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            get(handlers::get_task)
                .patch(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/deletion-logs", post(handlers::record_deletion))
        .route_layer(middleware::from_fn(track_request))
        .with_state(state)
}

/// Wrap each routed request in a span and record its duration.
async fn track_request(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let span = start_request_span(req.method().as_str(), &route);
    let started = Instant::now();

    let response = next.run(req).instrument(span.clone()).await;

    let status = response.status().as_u16();
    record_status(&span, status);
    metrics::request_duration_ms().record(
        started.elapsed().as_secs_f64() * 1000.0,
        &[
            KeyValue::new(HTTP_ROUTE, route),
            KeyValue::new(HTTP_RESPONSE_STATUS_CODE, i64::from(status)),
        ],
    );
    response
}
