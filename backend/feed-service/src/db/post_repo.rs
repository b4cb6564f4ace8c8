use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AuthorProjection, FeedPost, Post, PostView};
use crate::pagination::PageRequest;

use super::like_pattern;

/// Predicate selecting which posts a feed contains.
#[derive(Debug, Clone, PartialEq)]
pub enum PostFilter {
    /// Posts by any of these authors.
    AuthorIn(Vec<Uuid>),
    /// Posts by anyone except these authors.
    AuthorNotIn(Vec<Uuid>),
    /// Posts by one author.
    Author(Uuid),
    /// Case-insensitive substring match over post text.
    TextContains(String),
}

impl PostFilter {
    /// Evaluates the predicate in memory, with the same meaning as the SQL form.
    pub fn matches(&self, author_id: Uuid, text: &str) -> bool {
        match self {
            PostFilter::AuthorIn(ids) => ids.contains(&author_id),
            PostFilter::AuthorNotIn(ids) => !ids.contains(&author_id),
            PostFilter::Author(id) => *id == author_id,
            PostFilter::TextContains(query) => {
                text.to_lowercase().contains(&query.to_lowercase())
            }
        }
    }

    fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            PostFilter::AuthorIn(ids) => {
                qb.push("p.author_id = ANY(").push_bind(ids.clone()).push(")");
            }
            PostFilter::AuthorNotIn(ids) => {
                qb.push("NOT (p.author_id = ANY(")
                    .push_bind(ids.clone())
                    .push("))");
            }
            PostFilter::Author(id) => {
                qb.push("p.author_id = ").push_bind(*id);
            }
            PostFilter::TextContains(query) => {
                qb.push("p.text ILIKE ")
                    .push_bind(like_pattern(query))
                    .push(r" ESCAPE '\'");
            }
        }
    }
}

/// A page of matched posts and the total count under the same filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSlice {
    pub posts: Vec<FeedPost>,
    pub total_matches: u64,
}

/// Filtered feed query: newest first by `created_at`, ties by post id
/// descending, skipping `(page - 1) * page_size` rows.
#[async_trait]
pub trait FeedRepository: Send + Sync {
    async fn query(&self, filter: &PostFilter, page: PageRequest) -> Result<FeedSlice>;
}

/// Single-post reads and writes.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create_post(&self, author_id: Uuid, text: &str) -> Result<Post>;

    async fn find_post(&self, post_id: Uuid) -> Result<Option<PostView>>;

    /// Adds `account_id` to the post's like set. Returns `false` when the
    /// pair already existed.
    async fn insert_like(&self, post_id: Uuid, account_id: Uuid) -> Result<bool>;
}

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Posts whose author row is gone are excluded from both the page and the count.
const FEED_FROM: &str = " FROM posts p JOIN accounts a ON a.id = p.author_id WHERE ";

#[derive(sqlx::FromRow)]
struct FeedRow {
    id: Uuid,
    author_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
    username: String,
    avatar: Option<String>,
    like_count: i64,
    total_count: i64,
}

impl From<FeedRow> for FeedPost {
    fn from(row: FeedRow) -> Self {
        FeedPost {
            id: row.id,
            text: row.text,
            timestamp: row.created_at,
            like_count: row.like_count,
            user: AuthorProjection {
                id: row.author_id,
                username: row.username,
                avatar: row.avatar,
            },
        }
    }
}

impl PgPostRepository {
    async fn count(&self, filter: &PostFilter) -> Result<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        qb.push(FEED_FROM);
        filter.push_sql(&mut qb);
        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }
}

#[async_trait]
impl FeedRepository for PgPostRepository {
    async fn query(&self, filter: &PostFilter, page: PageRequest) -> Result<FeedSlice> {
        // The window count is evaluated over the same WHERE clause and snapshot
        // as the page rows, so the cursor can never disagree with the page.
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT p.id, p.author_id, p.text, p.created_at, a.username, a.avatar, \
             (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS like_count, \
             COUNT(*) OVER () AS total_count",
        );
        qb.push(FEED_FROM);
        filter.push_sql(&mut qb);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<FeedRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        let total_matches = match rows.first() {
            Some(row) => row.total_count.max(0) as u64,
            // Past the last page the window has no row to report on. The count
            // runs as its own statement and may see a newer snapshot.
            None if page.page > 1 => self.count(filter).await?,
            None => 0,
        };

        Ok(FeedSlice {
            posts: rows.into_iter().map(FeedPost::from).collect(),
            total_matches,
        })
    }
}

#[async_trait]
impl PostStore for PgPostRepository {
    async fn create_post(&self, author_id: Uuid, text: &str) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, author_id, text, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, author_id, text, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<PostView>> {
        let post = sqlx::query_as::<_, PostView>(
            r#"
            SELECT p.id, p.author_id, p.text, p.created_at,
                   ARRAY(
                       SELECT l.account_id FROM post_likes l
                       WHERE l.post_id = p.id
                       ORDER BY l.created_at, l.account_id
                   ) AS likes
            FROM posts p
            WHERE p.id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn insert_like(&self, post_id: Uuid, account_id: Uuid) -> Result<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, account_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (post_id, account_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(account_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted == 1)
    }
}
