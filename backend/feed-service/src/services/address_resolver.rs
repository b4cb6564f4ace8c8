use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::db::AccountStore;
use crate::error::{FeedError, Result};
use crate::models::Account;

/// Translates between local account ids and ledger addresses.
///
/// Set lookups drop unmatched members silently. Store failures propagate as
/// [`FeedError::DependencyUnavailable`] so an outage never reads as an empty set.
#[derive(Clone)]
pub struct AddressResolver {
    accounts: Arc<dyn AccountStore>,
}

impl AddressResolver {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.accounts
    }

    /// Accounts owning any of `addresses`, keyed by address. One store round trip.
    pub async fn accounts_by_address(
        &self,
        addresses: &HashSet<String>,
    ) -> Result<HashMap<String, Account>> {
        if addresses.is_empty() {
            return Ok(HashMap::new());
        }

        let wanted: Vec<String> = addresses.iter().cloned().collect();
        let accounts = self.accounts.find_by_addresses(&wanted).await?;

        Ok(accounts
            .into_iter()
            .filter_map(|account| match account.address.clone() {
                Some(address) if addresses.contains(&address) => Some((address, account)),
                _ => None,
            })
            .collect())
    }

    pub async fn addresses_to_account_ids(
        &self,
        addresses: &HashSet<String>,
    ) -> Result<HashSet<Uuid>> {
        Ok(self
            .accounts_by_address(addresses)
            .await?
            .into_values()
            .map(|account| account.id)
            .collect())
    }

    /// `None` both for unknown ids and for accounts created before addresses.
    pub async fn account_id_to_address(&self, id: Uuid) -> Result<Option<String>> {
        Ok(self
            .accounts
            .find_by_id(id)
            .await?
            .and_then(|account| account.address))
    }

    /// The caller's account, or `InvalidCaller` when the id names nobody.
    pub async fn caller_account(&self, caller: Uuid) -> Result<Account> {
        self.accounts
            .find_by_id(caller)
            .await?
            .ok_or_else(|| FeedError::InvalidCaller(format!("unknown account {}", caller)))
    }

    /// The caller's ledger address. Accounts without one cannot take part in
    /// the support graph.
    pub async fn caller_address(&self, caller: Uuid) -> Result<String> {
        self.account_id_to_address(caller).await?.ok_or_else(|| {
            FeedError::InvalidCaller(format!("account {} has no ledger address", caller))
        })
    }
}
