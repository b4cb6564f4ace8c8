/// Request-scoped caller identity.
///
/// Sessions are terminated upstream; the auth layer forwards the resolved
/// account id in the `x-account-id` header. Handlers take [`CallerId`] as an
/// extractor so a missing or malformed identity is rejected before any I/O.
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::FeedError;

pub const CALLER_HEADER: &str = "x-account-id";

/// Account id of the authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub Uuid);

fn caller_from(req: &HttpRequest) -> Result<CallerId, FeedError> {
    let raw = req
        .headers()
        .get(CALLER_HEADER)
        .ok_or_else(|| FeedError::InvalidCaller("missing caller identity".into()))?
        .to_str()
        .map_err(|_| FeedError::InvalidCaller("caller identity is not valid text".into()))?;

    Uuid::parse_str(raw.trim())
        .map(CallerId)
        .map_err(|_| FeedError::InvalidCaller(format!("malformed caller identity: {}", raw)))
}

impl FromRequest for CallerId {
    type Error = FeedError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(caller_from(req))
    }
}
