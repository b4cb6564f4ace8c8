//! Service layer for feed-service
//!
//! - address_resolver: account id <-> ledger address translation
//! - feed_composer: timeline, discover, search, author feeds, top supporters
//! - like_ledger: once-per-account likes
//! - profiles: profile views decorated with support edges, support mutations

pub mod address_resolver;
pub mod feed_composer;
pub mod like_ledger;
pub mod profiles;

pub use address_resolver::AddressResolver;
pub use feed_composer::FeedComposer;
pub use like_ledger::LikeLedger;
pub use profiles::{Direction, SupportDirectory};
