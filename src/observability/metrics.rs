//! Metrics recording.
//!
//! # Metrics
//! - `ledger_requests_total` (counter): requests by endpoint and outcome
//! - `ledger_request_duration_seconds` (histogram): latency by endpoint
//! - `ledger_batch_status_total` (counter): observed batch statuses

use std::time::Instant;

/// Record one completed ledger request.
pub fn record_request(endpoint: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!("ledger_requests_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("ledger_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record a batch status observed by a poll.
pub fn record_batch_status(status: &'static str) {
    metrics::counter!("ledger_batch_status_total", "status" => status).increment(1);
}
