//! Alert engine and task operations.
//!
//! [`rules`] and [`rank`] are pure; [`service`] wires them to the stores.

pub mod audit;
pub mod rank;
pub mod rules;
pub mod service;
pub mod tasks;

pub use audit::log_deletion;
pub use rank::{MAX_NOTIFICATIONS, compute_notifications};
pub use service::NotificationService;
pub use tasks::TaskService;
