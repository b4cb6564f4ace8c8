use chrono::{DateTime, Utc};
use ledger_client::SupportEdge;
use serde::Serialize;
use uuid::Uuid;

use crate::pagination::Cursor;

/// Account row as stored locally.
///
/// Not `Serialize` on purpose: it carries `email`. Responses go through
/// [`PublicProfile`], [`AuthorProjection`] or [`SupporterProfile`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    /// Ledger identity; assigned once at signup, may be absent on legacy rows.
    pub address: Option<String>,
    pub username: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub website: Option<String>,
    pub links: Vec<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public profile fields. Never includes private fields like email.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub address: Option<String>,
    pub username: String,
    pub desc: Option<String>,
    pub avatar: Option<String>,
    pub website: Option<String>,
    pub links: Vec<String>,
}

impl From<&Account> for PublicProfile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            address: account.address.clone(),
            username: account.username.clone(),
            desc: account.description.clone(),
            avatar: account.avatar.clone(),
            website: account.website.clone(),
            links: account.links.clone(),
        }
    }
}

/// Minimal author projection attached to feed posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorProjection {
    pub id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Single post with its like set, returned by post lookups and likes.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub likes: Vec<Uuid>,
}

/// Post as rendered in a feed, decorated with its author.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    pub id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub like_count: i64,
    pub user: AuthorProjection,
}

/// One page of posts plus the cursor for the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub posts: Vec<FeedPost>,
    #[serde(flatten)]
    pub cursor: Cursor,
}

/// One page of profiles from profile search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePage {
    pub users: Vec<PublicProfile>,
    #[serde(flatten)]
    pub cursor: Cursor,
}

/// Both directions of an address's support edges, as reported by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupportsView {
    pub supporting: Vec<SupportEdge>,
    pub supported: Vec<SupportEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub profile: Option<PublicProfile>,
    pub supports: SupportsView,
}

/// A profile with one direction of its support edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionalSupports {
    pub profile: PublicProfile,
    pub supports: Vec<SupportEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupporterProfile {
    pub id: Uuid,
    pub address: Option<String>,
    pub username: String,
    pub desc: Option<String>,
    pub avatar: Option<String>,
}

/// Account re-attached to its ledger support count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSupporter {
    #[serde(flatten)]
    pub profile: SupporterProfile,
    pub support_count: u64,
}

impl TopSupporter {
    pub fn new(account: &Account, support_count: u64) -> Self {
        Self {
            profile: SupporterProfile {
                id: account.id,
                address: account.address.clone(),
                username: account.username.clone(),
                desc: account.description.clone(),
                avatar: account.avatar.clone(),
            },
            support_count,
        }
    }
}
