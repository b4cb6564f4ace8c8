//! HTTP surface.
//!
//! Every response is HTTP 200 with a JSON envelope: `{success: true, data}` on
//! success, `{success: false, code, message}` on failure. Every route
//! requires a caller that resolves to a known account.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use ledger_client::SupportGraph;
use serde::Serialize;

use crate::config::FeedConfig;
use crate::db::{AccountStore, FeedRepository, PostStore};
use crate::error::FeedError;
use crate::services::{AddressResolver, FeedComposer, LikeLedger, SupportDirectory};

pub mod feed;
pub mod posts;
pub mod users;

#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T: Serialize> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub code: &'static str,
    pub message: String,
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(SuccessEnvelope {
        success: true,
        data,
    })
}

/// Shared handler state.
pub struct AppState {
    pub composer: FeedComposer,
    pub likes: LikeLedger,
    pub directory: SupportDirectory,
    pub resolver: AddressResolver,
    pub posts: Arc<dyn PostStore>,
    pub feed: FeedConfig,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        posts: Arc<dyn PostStore>,
        feed_repo: Arc<dyn FeedRepository>,
        graph: Arc<dyn SupportGraph>,
        feed: FeedConfig,
    ) -> Self {
        let resolver = AddressResolver::new(accounts);

        Self {
            composer: FeedComposer::new(resolver.clone(), feed_repo, graph.clone()),
            likes: LikeLedger::new(resolver.clone(), posts.clone()),
            directory: SupportDirectory::new(resolver.clone(), graph),
            resolver,
            posts,
            feed,
        }
    }
}

/// Registers every route plus extractor error handlers that keep malformed
/// bodies and query strings inside the envelope convention.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| FeedError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| FeedError::InvalidInput(err.to_string()).into()),
    )
    .service(feed::timeline)
    .service(feed::discover)
    .service(feed::search_posts)
    .service(feed::my_posts)
    .service(feed::author_posts)
    .service(feed::top_supporters)
    .service(posts::add_post)
    .service(posts::like_post)
    .service(posts::get_post)
    .service(users::get_info)
    .service(users::get_user)
    .service(users::get_user_supporting)
    .service(users::get_user_supported)
    .service(users::get_by_address)
    .service(users::search_profiles)
    .service(users::create_support)
    .service(users::delete_support);
}

pub(crate) fn parse_id(raw: &str, field: &str) -> crate::error::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(raw.trim())
        .map_err(|_| FeedError::InvalidInput(format!("{} is not a valid id", field)))
}
