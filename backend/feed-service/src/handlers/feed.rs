use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use tracing::debug;

use super::{ok, parse_id, AppState};
use crate::error::{FeedError, Result};
use crate::middleware::CallerId;
use crate::pagination::{PageParams, PageRequest};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorParams {
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

fn page_of(params: &PageParams, state: &AppState) -> PageRequest {
    PageRequest::from_params(params, state.feed.default_page_size)
}

#[get("/timeline")]
pub async fn timeline(
    caller: CallerId,
    query: web::Query<PageParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let page = page_of(&query, &state);
    debug!(caller = %caller.0, page = page.page, page_size = page.page_size, "timeline requested");

    let feed = state.composer.timeline(caller.0, page).await?;
    Ok(ok(feed))
}

#[get("/discover")]
pub async fn discover(
    caller: CallerId,
    query: web::Query<PageParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let page = page_of(&query, &state);
    let feed = state.composer.discover(caller.0, page).await?;
    Ok(ok(feed))
}

#[get("/posts/search")]
pub async fn search_posts(
    caller: CallerId,
    query: web::Query<SearchParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state.resolver.caller_account(caller.0).await?;
    let page = page_of(&query.page, &state);
    let feed = state.composer.search(&query.query, page).await?;
    Ok(ok(feed))
}

#[get("/posts/my")]
pub async fn my_posts(
    caller: CallerId,
    query: web::Query<PageParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let account = state.resolver.caller_account(caller.0).await?;
    let page = page_of(&query, &state);
    let feed = state.composer.author_posts(account.id, page).await?;
    Ok(ok(feed))
}

#[get("/posts")]
pub async fn author_posts(
    caller: CallerId,
    query: web::Query<AuthorParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state.resolver.caller_account(caller.0).await?;
    let raw = query
        .user_id
        .as_deref()
        .ok_or_else(|| FeedError::InvalidInput("userId is required".into()))?;
    let author = parse_id(raw, "userId")?;

    let page = page_of(&query.page, &state);
    let feed = state.composer.author_posts(author, page).await?;
    Ok(ok(feed))
}

#[get("/top")]
pub async fn top_supporters(caller: CallerId, state: web::Data<AppState>) -> Result<HttpResponse> {
    state.resolver.caller_account(caller.0).await?;
    let top = state
        .composer
        .top_supporters(state.feed.top_supporters_limit)
        .await?;
    Ok(ok(top))
}
