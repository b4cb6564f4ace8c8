use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};
use std::time::Instant;

lazy_static! {
    /// Duration of composed feed requests by variant (timeline, discover, search, author, top).
    pub static ref FEED_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_request_duration_seconds",
        "Feed composition duration segmented by variant",
        &["variant"]
    )
    .expect("failed to register feed_request_duration_seconds");

    /// Total composed feed requests by variant and outcome (success, or the error code).
    pub static ref FEED_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_requests_total",
        "Total feed composition requests segmented by variant and outcome",
        &["variant", "outcome"]
    )
    .expect("failed to register feed_requests_total");
}

/// Records one finished composition.
pub fn observe<T>(variant: &str, started: Instant, result: &crate::error::Result<T>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(err) => err.code(),
    };

    FEED_REQUEST_DURATION_SECONDS
        .with_label_values(&[variant])
        .observe(started.elapsed().as_secs_f64());
    FEED_REQUESTS_TOTAL
        .with_label_values(&[variant, outcome])
        .inc();
}
