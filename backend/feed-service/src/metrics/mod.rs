//! Feed composition metrics, scraped from `GET /metrics`.

use actix_web::HttpResponse;
use prometheus::{Encoder, TextEncoder};
use tracing::warn;

pub mod feed;

/// Default registry in the Prometheus text exposition format.
pub fn render() -> prometheus::Result<Vec<u8>> {
    let mut body = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut body)?;
    Ok(body)
}

pub async fn serve_metrics() -> HttpResponse {
    match render() {
        Ok(body) => HttpResponse::Ok()
            .content_type(TextEncoder::new().format_type())
            .body(body),
        Err(err) => {
            warn!(error = %err, "metrics encoding failed");
            HttpResponse::InternalServerError().finish()
        }
    }
}
