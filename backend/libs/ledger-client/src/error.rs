use std::time::Duration;
use thiserror::Error;

/// Errors returned by ledger calls.
///
/// The message from the remote side is always kept so callers can
/// surface it; nothing here is ever translated into an empty result.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("ledger request timed out after {0:?}")]
    Timeout(Duration),

    #[error("ledger transport error: {0}")]
    Transport(String),

    #[error("ledger returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The ledger answered 2xx but set `error` to something other than `noError`.
    #[error("ledger rejected request: {0}")]
    Remote(String),

    #[error("failed to decode ledger response: {0}")]
    Decode(String),

    #[error("ledger response has no data")]
    MissingData,
}

impl LedgerError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::Timeout(_) => "timeout",
            LedgerError::Transport(_) => "transport",
            LedgerError::Status { .. } => "status",
            LedgerError::Remote(_) => "remote",
            LedgerError::Decode(_) => "decode",
            LedgerError::MissingData => "missing_data",
        }
    }
}
