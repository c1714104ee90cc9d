//! Span helpers for request handling and notification computation.

use tracing::Span;

/// Start a span for one HTTP request.
///
/// The `http.response.status_code` field is declared empty and filled by
/// [`record_status`].
pub fn start_request_span(method: &str, route: &str) -> Span {
    tracing::info_span!(
        "http.request",
        "http.request.method" = method,
        "http.route" = route,
        "http.response.status_code" = tracing::field::Empty,
    )
}

/// Record the response status on a request span.
pub fn record_status(span: &Span, status: u16) {
    span.record("http.response.status_code", status);
}

/// Start a span covering one notification computation.
///
/// Snapshot sizes and the result count are filled by
/// [`record_notification_counts`].
pub fn start_notification_span() -> Span {
    tracing::info_span!(
        "notifications.compute",
        "notifications.tasks" = tracing::field::Empty,
        "notifications.deletions" = tracing::field::Empty,
        "notifications.count" = tracing::field::Empty,
    )
}

/// Record input and output sizes on a notification span.
pub fn record_notification_counts(span: &Span, tasks: usize, deletions: usize, count: usize) {
    span.record("notifications.tasks", tasks as u64);
    span.record("notifications.deletions", deletions as u64);
    span.record("notifications.count", count as u64);
}
