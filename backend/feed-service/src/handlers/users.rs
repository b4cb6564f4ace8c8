use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;

use super::{ok, parse_id, AppState};
use crate::error::Result;
use crate::middleware::CallerId;
use crate::pagination::{PageParams, PageRequest};
use crate::services::Direction;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportRequest {
    #[serde(default)]
    pub address_to: String,
    /// Accepted for compatibility; must equal the caller's address when present.
    pub address_from: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileSearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(flatten)]
    pub page: PageParams,
}

/// The caller's own profile with both support directions.
#[get("/info")]
pub async fn get_info(caller: CallerId, state: web::Data<AppState>) -> Result<HttpResponse> {
    let account = state.resolver.caller_account(caller.0).await?;
    let view = state.directory.profile_by_id(account.id).await?;
    Ok(ok(view))
}

#[get("/users/{id}")]
pub async fn get_user(
    caller: CallerId,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state.resolver.caller_account(caller.0).await?;
    let id = parse_id(&path, "id")?;
    let view = state.directory.profile_by_id(id).await?;
    Ok(ok(view))
}

#[get("/users/{id}/supporting")]
pub async fn get_user_supporting(
    caller: CallerId,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state.resolver.caller_account(caller.0).await?;
    let id = parse_id(&path, "id")?;
    let view = state.directory.directional(id, Direction::Supporting).await?;
    Ok(ok(view))
}

#[get("/users/{id}/supported")]
pub async fn get_user_supported(
    caller: CallerId,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state.resolver.caller_account(caller.0).await?;
    let id = parse_id(&path, "id")?;
    let view = state.directory.directional(id, Direction::Supported).await?;
    Ok(ok(view))
}

#[get("/address/{address}")]
pub async fn get_by_address(
    caller: CallerId,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state.resolver.caller_account(caller.0).await?;
    let view = state.directory.profile_by_address(path.trim()).await?;
    Ok(ok(view))
}

#[get("/profile/search")]
pub async fn search_profiles(
    caller: CallerId,
    query: web::Query<ProfileSearchParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state.resolver.caller_account(caller.0).await?;
    let page = PageRequest::from_params(&query.page, state.feed.default_page_size);
    let results = state.directory.search_profiles(&query.query, page).await?;
    Ok(ok(results))
}

#[post("/support")]
pub async fn create_support(
    caller: CallerId,
    body: web::Json<SupportRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let edge = state
        .directory
        .create_support(caller.0, &body.address_to, body.address_from.as_deref())
        .await?;
    Ok(ok(edge))
}

#[delete("/support")]
pub async fn delete_support(
    caller: CallerId,
    body: web::Json<SupportRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let edge = state
        .directory
        .delete_support(caller.0, &body.address_to, body.address_from.as_deref())
        .await?;
    Ok(ok(edge))
}
