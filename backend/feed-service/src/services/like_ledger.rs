use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::db::PostStore;
use crate::error::{FeedError, Result};
use crate::models::PostView;

use super::AddressResolver;

/// Records likes. Each (post, account) pair can be liked once; a repeat is
/// rejected with `AlreadyLiked`, never silently accepted.
pub struct LikeLedger {
    resolver: AddressResolver,
    posts: Arc<dyn PostStore>,
}

impl LikeLedger {
    pub fn new(resolver: AddressResolver, posts: Arc<dyn PostStore>) -> Self {
        Self { resolver, posts }
    }

    /// Preconditions run in order: caller exists, post exists, not yet liked.
    /// Returns the post with its updated like set.
    pub async fn add_like(&self, post_id: Uuid, caller: Uuid) -> Result<PostView> {
        let account = self.resolver.caller_account(caller).await?;

        let post = self
            .posts
            .find_post(post_id)
            .await?
            .ok_or(FeedError::PostNotFound(post_id))?;

        let already_liked = FeedError::AlreadyLiked {
            post_id,
            account_id: account.id,
        };
        if post.likes.contains(&account.id) {
            return Err(already_liked);
        }

        // A concurrent like can land between the read and the insert.
        if !self.posts.insert_like(post_id, account.id).await? {
            return Err(already_liked);
        }

        info!(post_id = %post_id, account_id = %account.id, "post liked");

        self.posts
            .find_post(post_id)
            .await?
            .ok_or(FeedError::PostNotFound(post_id))
    }
}
