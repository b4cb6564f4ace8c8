#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use backer_feed::config::FeedConfig;
use backer_feed::db::{AccountStore, FeedRepository, FeedSlice, PostFilter, PostStore};
use backer_feed::handlers::AppState;
use backer_feed::models::{Account, AuthorProjection, FeedPost, Post, PostView};
use backer_feed::pagination::PageRequest;
use backer_feed::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use ledger_client::{LedgerError, SupportCount, SupportEdge, SupportGraph};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    posts: Vec<Post>,
    likes: Vec<(Uuid, Uuid)>,
}

/// Accounts, posts and likes held in memory, with the same ordering and
/// counting rules as the PostgreSQL repositories.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&self, username: &str, address: Option<&str>) -> Account {
        let account = Account {
            id: Uuid::new_v4(),
            address: address.map(str::to_string),
            username: username.to_string(),
            description: Some(format!("{} on backer", username)),
            avatar: Some(format!("https://cdn.example/{}.png", username)),
            website: None,
            links: Vec::new(),
            email: Some(format!("{}@example.com", username)),
            created_at: base_time(),
        };
        self.tables.lock().unwrap().accounts.push(account.clone());
        account
    }

    pub fn add_post_at(&self, author: &Account, text: &str, created_at: DateTime<Utc>) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            author_id: author.id,
            text: text.to_string(),
            created_at,
        };
        self.tables.lock().unwrap().posts.push(post.clone());
        post
    }

    /// `count` posts by `author`, one minute apart, newest last.
    pub fn add_posts(&self, author: &Account, count: usize) -> Vec<Post> {
        (0..count)
            .map(|i| {
                self.add_post_at(
                    author,
                    &format!("{} post {}", author.username, i),
                    base_time() + Duration::minutes(i as i64),
                )
            })
            .collect()
    }

    pub fn like_count(&self, post_id: Uuid) -> usize {
        self.tables
            .lock()
            .unwrap()
            .likes
            .iter()
            .filter(|(p, _)| *p == post_id)
            .count()
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn view(tables: &Tables, post: &Post) -> PostView {
    PostView {
        id: post.id,
        author_id: post.author_id,
        text: post.text.clone(),
        created_at: post.created_at,
        likes: tables
            .likes
            .iter()
            .filter(|(p, _)| *p == post.id)
            .map(|(_, a)| *a)
            .collect(),
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_address(&self, address: &str) -> Result<Option<Account>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.address.as_deref() == Some(address))
            .cloned())
    }

    async fn find_by_addresses(&self, addresses: &[String]) -> Result<Vec<Account>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .accounts
            .iter()
            .filter(|a| matches!(&a.address, Some(addr) if addresses.contains(addr)))
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str, page: PageRequest) -> Result<(Vec<Account>, u64)> {
        let needle = query.to_lowercase();
        let tables = self.tables.lock().unwrap();
        let mut matched: Vec<Account> = tables
            .accounts
            .iter()
            .filter(|a| {
                a.username.to_lowercase().contains(&needle)
                    || a.description
                        .as_deref()
                        .map(|d| d.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.username.cmp(&b.username).then(a.id.cmp(&b.id)));

        let total = matched.len() as u64;
        let users = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((users, total))
    }
}

#[async_trait]
impl FeedRepository for MemoryStore {
    async fn query(&self, filter: &PostFilter, page: PageRequest) -> Result<FeedSlice> {
        let tables = self.tables.lock().unwrap();
        let authors: HashMap<Uuid, &Account> =
            tables.accounts.iter().map(|a| (a.id, a)).collect();

        let mut matched: Vec<&Post> = tables
            .posts
            .iter()
            .filter(|p| authors.contains_key(&p.author_id))
            .filter(|p| filter.matches(p.author_id, &p.text))
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total_matches = matched.len() as u64;
        let posts = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|p| {
                let author = authors[&p.author_id];
                FeedPost {
                    id: p.id,
                    text: p.text.clone(),
                    timestamp: p.created_at,
                    like_count: tables.likes.iter().filter(|(id, _)| *id == p.id).count() as i64,
                    user: AuthorProjection {
                        id: author.id,
                        username: author.username.clone(),
                        avatar: author.avatar.clone(),
                    },
                }
            })
            .collect();

        Ok(FeedSlice {
            posts,
            total_matches,
        })
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_post(&self, author_id: Uuid, text: &str) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().posts.push(post.clone());
        Ok(post)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<PostView>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| view(&tables, p)))
    }

    async fn insert_like(&self, post_id: Uuid, account_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        if tables.likes.contains(&(post_id, account_id)) {
            return Ok(false);
        }
        tables.likes.push((post_id, account_id));
        Ok(true)
    }
}

/// Support graph held in memory. `fail` makes every call time out.
#[derive(Clone, Default)]
pub struct FakeLedger {
    edges: Arc<Mutex<Vec<SupportEdge>>>,
    top: Arc<Mutex<Vec<SupportCount>>>,
    failing: Arc<AtomicBool>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn support(&self, from: &str, to: &str) {
        self.edges.lock().unwrap().push(SupportEdge {
            address_from: from.to_string(),
            address_to: to.to_string(),
        });
    }

    pub fn set_top(&self, ranking: &[(&str, u64)]) {
        *self.top.lock().unwrap() = ranking
            .iter()
            .map(|(address, support_count)| SupportCount {
                address: address.to_string(),
                support_count: *support_count,
            })
            .collect();
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn edges(&self) -> Vec<SupportEdge> {
        self.edges.lock().unwrap().clone()
    }

    fn check(&self) -> std::result::Result<(), LedgerError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(LedgerError::Timeout(std::time::Duration::from_millis(50)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SupportGraph for FakeLedger {
    async fn supporting(&self, address: &str) -> std::result::Result<Vec<SupportEdge>, LedgerError> {
        self.check()?;
        Ok(self
            .edges()
            .into_iter()
            .filter(|e| e.address_from == address)
            .collect())
    }

    async fn supported(&self, address: &str) -> std::result::Result<Vec<SupportEdge>, LedgerError> {
        self.check()?;
        Ok(self
            .edges()
            .into_iter()
            .filter(|e| e.address_to == address)
            .collect())
    }

    async fn top_supports(&self) -> std::result::Result<Vec<SupportCount>, LedgerError> {
        self.check()?;
        Ok(self.top.lock().unwrap().clone())
    }

    async fn create_support(
        &self,
        address_from: &str,
        address_to: &str,
    ) -> std::result::Result<(), LedgerError> {
        self.check()?;
        self.support(address_from, address_to);
        Ok(())
    }

    async fn delete_support(
        &self,
        address_from: &str,
        address_to: &str,
    ) -> std::result::Result<(), LedgerError> {
        self.check()?;
        self.edges
            .lock()
            .unwrap()
            .retain(|e| !(e.address_from == address_from && e.address_to == address_to));
        Ok(())
    }
}

pub fn feed_config() -> FeedConfig {
    FeedConfig {
        default_page_size: 10,
        top_supporters_limit: 100,
    }
}

pub fn app_state(store: &MemoryStore, ledger: &FakeLedger) -> AppState {
    AppState::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(ledger.clone()),
        feed_config(),
    )
}
