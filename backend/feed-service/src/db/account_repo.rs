use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::Result;
use crate::models::Account;
use crate::pagination::PageRequest;

use super::like_pattern;

const ACCOUNT_COLUMNS: &str =
    "id, address, username, description, avatar, website, links, email, created_at";

/// Read access to the local account store.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    async fn find_by_address(&self, address: &str) -> Result<Option<Account>>;

    /// Accounts whose address is in `addresses`, in one set-membership query.
    /// Addresses with no account are simply absent from the result.
    async fn find_by_addresses(&self, addresses: &[String]) -> Result<Vec<Account>>;

    /// Case-insensitive substring search over username or description.
    /// Returns the page and the total match count for the same predicate, read
    /// from the same statement whenever the page is non-empty.
    async fn search(&self, query: &str, page: PageRequest) -> Result<(Vec<Account>, u64)>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_matches(&self, query: &str) -> Result<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM accounts WHERE ");
        push_search_predicate(&mut qb, query);
        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    #[sqlx(flatten)]
    account: Account,
    total_count: i64,
}

fn push_search_predicate(qb: &mut QueryBuilder<'_, Postgres>, query: &str) {
    let pattern = like_pattern(query);
    qb.push("(username ILIKE ")
        .push_bind(pattern.clone())
        .push(r" ESCAPE '\' OR description ILIKE ")
        .push_bind(pattern)
        .push(r" ESCAPE '\')");
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_address(&self, address: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE address = $1"
        ))
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_addresses(&self, addresses: &[String]) -> Result<Vec<Account>> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE address = ANY($1)"
        ))
        .bind(addresses)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn search(&self, query: &str, page: PageRequest) -> Result<(Vec<Account>, u64)> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ACCOUNT_COLUMNS}, COUNT(*) OVER () AS total_count FROM accounts WHERE "
        ));
        push_search_predicate(&mut qb, query);
        qb.push(" ORDER BY username ASC, id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows: Vec<AccountRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        let total = match rows.first() {
            Some(row) => row.total_count.max(0) as u64,
            // Separate statement, so not snapshot-consistent with the empty page.
            None if page.page > 1 => self.count_matches(query).await?,
            None => 0,
        };

        Ok((rows.into_iter().map(|row| row.account).collect(), total))
    }
}
