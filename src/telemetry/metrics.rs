//! Metric instrument factories for taskdesk.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"taskdesk"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for taskdesk instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("taskdesk")
}

/// Counter: notifications returned to callers.
/// Labels: `type` ("overdue" | "unassigned" | "pending" | "urgent").
pub fn notifications_emitted() -> Counter<u64> {
    meter()
        .u64_counter("taskdesk.notifications.emitted")
        .with_description("Number of notifications returned to callers")
        .build()
}

/// Counter: store reads that failed and were replaced with an empty result.
/// Labels: `source`.
pub fn degraded_reads() -> Counter<u64> {
    meter()
        .u64_counter("taskdesk.store.degraded_reads")
        .with_description("Store reads degraded to an empty result")
        .build()
}

/// Counter: deletion-log inserts that failed after validation passed.
pub fn deletion_log_failures() -> Counter<u64> {
    meter()
        .u64_counter("taskdesk.deletion_log.write_failures")
        .with_description("Deletion audit writes that failed and were swallowed")
        .build()
}

/// Counter: retries of transient store failures.
/// Labels: `operation`.
pub fn store_retries() -> Counter<u64> {
    meter()
        .u64_counter("taskdesk.store.retries")
        .with_description("Number of retried store operations")
        .build()
}

/// Histogram: HTTP request duration in milliseconds.
/// Labels: `http.route`, `http.response.status_code`.
pub fn request_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("taskdesk.http.request.duration_ms")
        .with_description("HTTP request duration in milliseconds")
        .with_unit("ms")
        .build()
}
