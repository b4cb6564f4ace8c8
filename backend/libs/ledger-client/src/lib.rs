//! Typed HTTP client for the ledger service.
//!
//! The ledger is the source of truth for addresses and for the directed
//! support graph (`addressFrom -> addressTo`). This crate exposes:
//! - [`SupportGraph`]: the seam services depend on for support-edge reads and writes
//! - [`LedgerClient`]: the reqwest-backed implementation with a bounded timeout
//! - [`LedgerError`]: every non-success outcome, including application-level
//!   `error` fields carried in an otherwise successful HTTP response
//!
//! No edge is ever cached here; every read goes to the remote service.
//!
//! # Example
//!
//! ```rust,no_run
//! use ledger_client::{LedgerClient, LedgerConfig, SupportGraph};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), ledger_client::LedgerError> {
//! let client = LedgerClient::new(&LedgerConfig {
//!     base_url: "http://localhost:5447".to_string(),
//!     timeout: Duration::from_secs(5),
//! })?;
//! let edges = client.supporting("SIM1EiJNudXjYReCz5NDc1Nokhf1RDsPosmJo").await?;
//! println!("supports {} addresses", edges.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod metrics;
pub mod models;

pub use client::{LedgerClient, LedgerConfig, SupportGraph};
pub use error::LedgerError;
pub use models::{SupportCount, SupportEdge, NO_ERROR};
