/// Error types for the feed service
///
/// Every failure is a typed, inspectable [`FeedError`]. At the HTTP boundary
/// each one renders as the `{success: false, code, message}` envelope.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use ledger_client::LedgerError;
use thiserror::Error;
use uuid::Uuid;

use crate::handlers::ErrorEnvelope;

/// Result type for feed-service operations
pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Error, Debug)]
pub enum FeedError {
    /// Caller identity missing, malformed, or unknown. Raised before any I/O.
    #[error("Invalid caller: {0}")]
    InvalidCaller(String),

    #[error("Post not found: {0}")]
    PostNotFound(Uuid),

    #[error("Post {post_id} already liked by {account_id}")]
    AlreadyLiked { post_id: Uuid, account_id: Uuid },

    /// Direct lookup of a single account that does not exist. Set-based
    /// lookups never raise this; unmatched members are dropped instead.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Local store unreachable or failing.
    #[error("Store unavailable: {0}")]
    DependencyUnavailable(String),

    /// Ledger unreachable, timed out, or answered with an error.
    #[error("Ledger error: {0}")]
    DependencyError(#[from] LedgerError),
}

impl FeedError {
    /// Machine-readable code carried in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            FeedError::InvalidCaller(_) => "INVALID_CALLER",
            FeedError::PostNotFound(_) => "POST_NOT_FOUND",
            FeedError::AlreadyLiked { .. } => "ALREADY_LIKED",
            FeedError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            FeedError::InvalidInput(_) => "INVALID_INPUT",
            FeedError::DependencyUnavailable(_) => "DEPENDENCY_UNAVAILABLE",
            FeedError::DependencyError(_) => "DEPENDENCY_ERROR",
        }
    }

    pub fn is_dependency_failure(&self) -> bool {
        matches!(
            self,
            FeedError::DependencyUnavailable(_) | FeedError::DependencyError(_)
        )
    }
}

impl From<sqlx::Error> for FeedError {
    fn from(err: sqlx::Error) -> Self {
        FeedError::DependencyUnavailable(err.to_string())
    }
}

impl From<validator::ValidationErrors> for FeedError {
    fn from(err: validator::ValidationErrors) -> Self {
        FeedError::InvalidInput(err.to_string())
    }
}

impl ResponseError for FeedError {
    // Clients branch on `success`, never on the transport status.
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_dependency_failure() {
            tracing::error!(code = self.code(), error = %self, "request failed on dependency");
        } else {
            tracing::debug!(code = self.code(), error = %self, "request rejected");
        }

        HttpResponse::build(self.status_code()).json(ErrorEnvelope {
            success: false,
            code: self.code(),
            message: self.to_string(),
        })
    }
}
