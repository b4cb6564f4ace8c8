use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Value of the ledger's `error` field when a call succeeded.
pub const NO_ERROR: &str = "noError";

/// Directed support edge: `address_from` supports `address_to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportEdge {
    pub address_from: String,
    pub address_to: String,
}

/// One entry of the ledger's top-supports ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportCount {
    pub address: String,
    pub support_count: u64,
}

/// Body of `POST /support` and `DELETE /support`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SupportRequest<'a> {
    pub address_from: &'a str,
    pub address_to: &'a str,
}

/// Payload of the supporting/supported endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct SupportsData {
    #[serde(default)]
    pub supports: Vec<SupportEdge>,
}

/// Every ledger response is wrapped as `{ "error": ..., "data": ... }`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    fn check_error(&self) -> Result<(), LedgerError> {
        match self.error.as_deref() {
            None | Some("") | Some(NO_ERROR) => Ok(()),
            Some(other) => Err(LedgerError::Remote(other.to_string())),
        }
    }

    /// Payload of a read call; a missing `data` field is an error.
    pub fn into_data(self) -> Result<T, LedgerError> {
        self.check_error()?;
        self.data.ok_or(LedgerError::MissingData)
    }

    /// Outcome of a write call, where `data` is optional.
    pub fn into_ack(self) -> Result<(), LedgerError> {
        self.check_error()
    }
}
