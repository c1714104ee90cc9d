//! # taskdesk
//!
//! Postgres-backed task tracking service with derived admin alerts.
//!
//! Provides the task and deletion-audit stores, the notification engine
//! (overdue, unassigned, stale-pending, urgent and deletion alerts), an axum
//! HTTP surface, and OpenTelemetry observability.

pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod model;
pub mod retry;
pub mod store;
pub mod telemetry;
