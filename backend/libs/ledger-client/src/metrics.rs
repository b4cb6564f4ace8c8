use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

use crate::error::LedgerError;

lazy_static! {
    /// Ledger calls segmented by operation and outcome (`ok` or an error kind).
    pub static ref LEDGER_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "ledger_requests_total",
        "Total ledger requests segmented by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("failed to register ledger_requests_total");

    /// Ledger call latency by operation.
    pub static ref LEDGER_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "ledger_request_duration_seconds",
        "Ledger request duration segmented by operation",
        &["operation"]
    )
    .expect("failed to register ledger_request_duration_seconds");
}

pub(crate) fn record<T>(operation: &str, elapsed_secs: f64, result: &Result<T, LedgerError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    LEDGER_REQUESTS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    LEDGER_REQUEST_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(elapsed_secs);
}
