//! Feed composition and pagination for the Backer social backend.
//!
//! Local posts and accounts live in PostgreSQL; the support graph lives in
//! the ledger service and is always read through [`ledger_client`].

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod services;

pub use config::Config;
pub use error::{FeedError, Result};
