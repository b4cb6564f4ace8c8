use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::{ok, parse_id, AppState};
use crate::error::{FeedError, Result};
use crate::middleware::CallerId;

#[derive(Debug, Deserialize, Validate)]
pub struct NewPostRequest {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub post_id: String,
}

#[post("/post/add")]
pub async fn add_post(
    caller: CallerId,
    body: web::Json<NewPostRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    body.validate()?;
    if body.text.trim().is_empty() {
        return Err(FeedError::InvalidInput("text must not be blank".into()));
    }

    // Only known accounts may author posts.
    state.resolver.caller_account(caller.0).await?;

    let post = state.posts.create_post(caller.0, &body.text).await?;
    info!(post_id = %post.id, author_id = %caller.0, "post created");

    let view = state
        .posts
        .find_post(post.id)
        .await?
        .ok_or(FeedError::PostNotFound(post.id))?;
    Ok(ok(view))
}

#[post("/post/like")]
pub async fn like_post(
    caller: CallerId,
    body: web::Json<LikeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&body.post_id, "postId")?;
    let post = state.likes.add_like(post_id, caller.0).await?;
    Ok(ok(post))
}

#[get("/post/{post_id}")]
pub async fn get_post(
    caller: CallerId,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state.resolver.caller_account(caller.0).await?;
    let post_id = parse_id(&path, "postId")?;
    let post = state
        .posts
        .find_post(post_id)
        .await?
        .ok_or(FeedError::PostNotFound(post_id))?;
    Ok(ok(post))
}
