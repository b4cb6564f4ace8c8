use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::metrics;
use crate::models::{Envelope, SupportCount, SupportEdge, SupportRequest, SupportsData};

/// Support-graph operations exposed by the ledger.
///
/// Reads are idempotent and uncached. Writes are linearized at the ledger; a
/// read issued right after a write may or may not observe it.
#[async_trait]
pub trait SupportGraph: Send + Sync {
    /// Edges where `address_from == address`.
    async fn supporting(&self, address: &str) -> Result<Vec<SupportEdge>, LedgerError>;

    /// Edges where `address_to == address`.
    async fn supported(&self, address: &str) -> Result<Vec<SupportEdge>, LedgerError>;

    /// Addresses ranked by support count, as ordered by the ledger.
    async fn top_supports(&self) -> Result<Vec<SupportCount>, LedgerError>;

    async fn create_support(&self, address_from: &str, address_to: &str)
        -> Result<(), LedgerError>;

    async fn delete_support(&self, address_from: &str, address_to: &str)
        -> Result<(), LedgerError>;
}

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Base URL of the ledger service, e.g. `http://localhost:5447`.
    pub base_url: String,
    /// Upper bound applied to every request, connect included.
    pub timeout: Duration,
}

/// reqwest-backed [`SupportGraph`].
#[derive(Clone)]
pub struct LedgerClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl LedgerClient {
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LedgerError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, err: reqwest::Error) -> LedgerError {
        if err.is_timeout() {
            LedgerError::Timeout(self.timeout)
        } else {
            LedgerError::Transport(err.to_string())
        }
    }

    async fn read_envelope<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<Envelope<T>, LedgerError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(LedgerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| LedgerError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, LedgerError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_envelope::<T>(response).await?.into_data()
    }

    async fn write_edge(
        &self,
        method: Method,
        address_from: &str,
        address_to: &str,
    ) -> Result<(), LedgerError> {
        let response = self
            .http
            .request(method, self.url("/support"))
            .json(&SupportRequest {
                address_from,
                address_to,
            })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_envelope::<serde_json::Value>(response)
            .await?
            .into_ack()
    }

    async fn supports_at(&self, path: String) -> Result<Vec<SupportEdge>, LedgerError> {
        self.get::<SupportsData>(&path).await.map(|d| d.supports)
    }
}

/// Runs a ledger call, recording its outcome and logging failures.
async fn observe<T, F>(operation: &'static str, call: F) -> Result<T, LedgerError>
where
    F: std::future::Future<Output = Result<T, LedgerError>>,
{
    let started = Instant::now();
    let result = call.await;
    metrics::record(operation, started.elapsed().as_secs_f64(), &result);

    match &result {
        Ok(_) => debug!(operation, "ledger call succeeded"),
        Err(e) => warn!(operation, error = %e, kind = e.kind(), "ledger call failed"),
    }
    result
}

#[async_trait]
impl SupportGraph for LedgerClient {
    async fn supporting(&self, address: &str) -> Result<Vec<SupportEdge>, LedgerError> {
        let path = format!("/address/supporting/{}", urlencoding::encode(address));
        observe("supporting", self.supports_at(path)).await
    }

    async fn supported(&self, address: &str) -> Result<Vec<SupportEdge>, LedgerError> {
        let path = format!("/address/supported/{}", urlencoding::encode(address));
        observe("supported", self.supports_at(path)).await
    }

    async fn top_supports(&self) -> Result<Vec<SupportCount>, LedgerError> {
        observe("top_supports", self.get::<Vec<SupportCount>>("/support/top")).await
    }

    async fn create_support(
        &self,
        address_from: &str,
        address_to: &str,
    ) -> Result<(), LedgerError> {
        observe(
            "create_support",
            self.write_edge(Method::POST, address_from, address_to),
        )
        .await
    }

    async fn delete_support(
        &self,
        address_from: &str,
        address_to: &str,
    ) -> Result<(), LedgerError> {
        observe(
            "delete_support",
            self.write_edge(Method::DELETE, address_from, address_to),
        )
        .await
    }
}
