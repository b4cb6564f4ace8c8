//! Fixed in-memory account stores for unit tests.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::AccountStore;
use crate::error::{FeedError, Result};
use crate::models::Account;
use crate::pagination::PageRequest;

pub fn account(username: &str, address: Option<&str>) -> Account {
    Account {
        id: Uuid::new_v4(),
        address: address.map(str::to_string),
        username: username.to_string(),
        description: None,
        avatar: None,
        website: None,
        links: Vec::new(),
        email: None,
        created_at: Utc::now(),
    }
}

pub struct FixedAccounts(pub Vec<Account>);

#[async_trait]
impl AccountStore for FixedAccounts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.0.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_address(&self, address: &str) -> Result<Option<Account>> {
        Ok(self
            .0
            .iter()
            .find(|a| a.address.as_deref() == Some(address))
            .cloned())
    }

    async fn find_by_addresses(&self, addresses: &[String]) -> Result<Vec<Account>> {
        Ok(self
            .0
            .iter()
            .filter(|a| matches!(&a.address, Some(addr) if addresses.contains(addr)))
            .cloned()
            .collect())
    }

    async fn search(&self, _query: &str, _page: PageRequest) -> Result<(Vec<Account>, u64)> {
        Ok((Vec::new(), 0))
    }
}

pub struct DownAccounts;

fn refused<T>() -> Result<T> {
    Err(FeedError::DependencyUnavailable("connection refused".into()))
}

#[async_trait]
impl AccountStore for DownAccounts {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Account>> {
        refused()
    }

    async fn find_by_address(&self, _address: &str) -> Result<Option<Account>> {
        refused()
    }

    async fn find_by_addresses(&self, _addresses: &[String]) -> Result<Vec<Account>> {
        refused()
    }

    async fn search(&self, _query: &str, _page: PageRequest) -> Result<(Vec<Account>, u64)> {
        refused()
    }
}
