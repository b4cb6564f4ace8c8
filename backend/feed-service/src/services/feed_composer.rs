//! Feed composition.
//!
//! Joins the ledger's support graph with the local post store:
//!
//! 1. resolve the caller's address,
//! 2. fetch the addresses the caller supports from the ledger,
//! 3. map those addresses back to local account ids (unmatched ones drop out),
//! 4. run one filtered, newest-first, paginated repository query,
//! 5. derive the cursor from the same query's total.
//!
//! Every step fails loudly. A ledger or store outage is an error, never an
//! empty feed.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use ledger_client::SupportGraph;
use tracing::debug;
use uuid::Uuid;

use super::AddressResolver;
use crate::db::{FeedRepository, PostFilter};
use crate::error::Result;
use crate::metrics::feed as feed_metrics;
use crate::models::{FeedPage, TopSupporter};
use crate::pagination::PageRequest;

pub struct FeedComposer {
    resolver: AddressResolver,
    posts: Arc<dyn FeedRepository>,
    graph: Arc<dyn SupportGraph>,
}

async fn observed<T, F>(variant: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let result = fut.await;
    feed_metrics::observe(variant, started, &result);
    result
}

fn sorted(ids: HashSet<Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids
}

impl FeedComposer {
    pub fn new(
        resolver: AddressResolver,
        posts: Arc<dyn FeedRepository>,
        graph: Arc<dyn SupportGraph>,
    ) -> Self {
        Self {
            resolver,
            posts,
            graph,
        }
    }

    /// Posts by accounts the caller supports, newest first.
    pub async fn timeline(&self, caller: Uuid, page: PageRequest) -> Result<FeedPage> {
        observed("timeline", self.compose_timeline(caller, page)).await
    }

    /// Posts by everyone the caller does not support, excluding the caller.
    pub async fn discover(&self, caller: Uuid, page: PageRequest) -> Result<FeedPage> {
        observed("discover", self.compose_discover(caller, page)).await
    }

    /// Case-insensitive substring search over post text.
    pub async fn search(&self, query: &str, page: PageRequest) -> Result<FeedPage> {
        let filter = PostFilter::TextContains(query.to_string());
        observed("search", self.page(&filter, page)).await
    }

    /// One author's posts, newest first.
    pub async fn author_posts(&self, author: Uuid, page: PageRequest) -> Result<FeedPage> {
        let filter = PostFilter::Author(author);
        observed("author", self.page(&filter, page)).await
    }

    /// Ledger ranking re-attached to local accounts.
    ///
    /// Addresses without an account drop out. The result is re-sorted by
    /// support count descending; the sort is stable, so ties keep the
    /// ledger's relative order.
    pub async fn top_supporters(&self, limit: usize) -> Result<Vec<TopSupporter>> {
        observed("top", self.compose_top(limit)).await
    }

    async fn compose_timeline(&self, caller: Uuid, page: PageRequest) -> Result<FeedPage> {
        let address = self.resolver.caller_address(caller).await?;
        let supported = self.supported_addresses(&address).await?;
        let authors = self.resolver.addresses_to_account_ids(&supported).await?;

        debug!(
            caller = %caller,
            supported = supported.len(),
            resolved = authors.len(),
            "timeline author set resolved"
        );

        if authors.is_empty() {
            return Ok(FeedPage {
                posts: Vec::new(),
                cursor: page.cursor(0),
            });
        }

        self.page(&PostFilter::AuthorIn(sorted(authors)), page).await
    }

    async fn compose_discover(&self, caller: Uuid, page: PageRequest) -> Result<FeedPage> {
        let address = self.resolver.caller_address(caller).await?;
        let mut excluded = self.supported_addresses(&address).await?;
        excluded.insert(address);

        let mut authors = self.resolver.addresses_to_account_ids(&excluded).await?;
        authors.insert(caller);

        debug!(caller = %caller, excluded = authors.len(), "discover exclusion set resolved");

        self.page(&PostFilter::AuthorNotIn(sorted(authors)), page).await
    }

    async fn compose_top(&self, limit: usize) -> Result<Vec<TopSupporter>> {
        let ranked = self.graph.top_supports().await?;
        let addresses: HashSet<String> = ranked.iter().map(|entry| entry.address.clone()).collect();
        let accounts = self.resolver.accounts_by_address(&addresses).await?;

        let mut seen = HashSet::with_capacity(ranked.len());
        let mut top: Vec<TopSupporter> = ranked
            .iter()
            .filter(|entry| seen.insert(entry.address.as_str()))
            .filter_map(|entry| {
                accounts
                    .get(&entry.address)
                    .map(|account| TopSupporter::new(account, entry.support_count))
            })
            .collect();

        top.sort_by(|a, b| b.support_count.cmp(&a.support_count));
        top.truncate(limit);
        Ok(top)
    }

    async fn supported_addresses(&self, address: &str) -> Result<HashSet<String>> {
        Ok(self
            .graph
            .supporting(address)
            .await?
            .into_iter()
            .map(|edge| edge.address_to)
            .collect())
    }

    async fn page(&self, filter: &PostFilter, page: PageRequest) -> Result<FeedPage> {
        let slice = self.posts.query(filter, page).await?;
        Ok(FeedPage {
            cursor: page.cursor(slice.total_matches),
            posts: slice.posts,
        })
    }
}
