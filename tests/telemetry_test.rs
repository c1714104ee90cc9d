//! Integration tests for telemetry initialization and span helpers.

#[test]
fn telemetry_initializes_without_endpoint() {
    // Note: tracing subscriber can only be set once per process.
    // Using try_init() in the implementation avoids panics if another
    // test already initialized a subscriber.
    let config = taskdesk::telemetry::TelemetryConfig::local("taskdesk-test");
    // This may return Err if a global subscriber was already set by
    // another test in this process; that is acceptable.
    let _guard = taskdesk::telemetry::init_telemetry(config);
}

#[test]
fn request_span_creates_and_records_status() {
    let span = taskdesk::telemetry::request::start_request_span("GET", "/notifications");
    taskdesk::telemetry::request::record_status(&span, 200);
}

#[test]
fn notification_span_records_counts() {
    let span = taskdesk::telemetry::request::start_notification_span();
    taskdesk::telemetry::request::record_notification_counts(&span, 25, 3, 10);
}
