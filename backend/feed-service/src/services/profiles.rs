use std::sync::Arc;

use ledger_client::{SupportEdge, SupportGraph};
use tracing::info;
use uuid::Uuid;

use super::AddressResolver;
use crate::error::{FeedError, Result};
use crate::models::{Account, DirectionalSupports, ProfilePage, ProfileView, PublicProfile, SupportsView};
use crate::pagination::PageRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Edges leaving the address.
    Supporting,
    /// Edges arriving at the address.
    Supported,
}

/// Profile lookups decorated with support edges, plus support mutations.
///
/// Edges are always read from the ledger; nothing here stores or caches them.
pub struct SupportDirectory {
    resolver: AddressResolver,
    graph: Arc<dyn SupportGraph>,
}

impl SupportDirectory {
    pub fn new(resolver: AddressResolver, graph: Arc<dyn SupportGraph>) -> Self {
        Self { resolver, graph }
    }

    pub async fn profile_by_id(&self, id: Uuid) -> Result<ProfileView> {
        let account = self.account(id).await?;
        let supports = match account.address.as_deref() {
            Some(address) => self.both_directions(address).await?,
            None => SupportsView::default(),
        };

        Ok(ProfileView {
            profile: Some(PublicProfile::from(&account)),
            supports,
        })
    }

    /// The profile is absent when no local account owns `address`; the ledger
    /// is still asked for its edges.
    pub async fn profile_by_address(&self, address: &str) -> Result<ProfileView> {
        let account = self.resolver.store().find_by_address(address).await?;
        let supports = self.both_directions(address).await?;

        Ok(ProfileView {
            profile: account.as_ref().map(PublicProfile::from),
            supports,
        })
    }

    pub async fn directional(&self, id: Uuid, direction: Direction) -> Result<DirectionalSupports> {
        let account = self.account(id).await?;
        let supports = match account.address.as_deref() {
            Some(address) => match direction {
                Direction::Supporting => self.graph.supporting(address).await?,
                Direction::Supported => self.graph.supported(address).await?,
            },
            None => Vec::new(),
        };

        Ok(DirectionalSupports {
            profile: PublicProfile::from(&account),
            supports,
        })
    }

    pub async fn create_support(
        &self,
        caller: Uuid,
        address_to: &str,
        claimed_from: Option<&str>,
    ) -> Result<SupportEdge> {
        let edge = self.edge_for(caller, address_to, claimed_from).await?;
        self.graph
            .create_support(&edge.address_from, &edge.address_to)
            .await?;

        info!(from = %edge.address_from, to = %edge.address_to, "support created");
        Ok(edge)
    }

    pub async fn delete_support(
        &self,
        caller: Uuid,
        address_to: &str,
        claimed_from: Option<&str>,
    ) -> Result<SupportEdge> {
        let edge = self.edge_for(caller, address_to, claimed_from).await?;
        self.graph
            .delete_support(&edge.address_from, &edge.address_to)
            .await?;

        info!(from = %edge.address_from, to = %edge.address_to, "support deleted");
        Ok(edge)
    }

    /// Case-insensitive substring search over username or description.
    pub async fn search_profiles(&self, query: &str, page: PageRequest) -> Result<ProfilePage> {
        let (accounts, total) = self.resolver.store().search(query, page).await?;

        Ok(ProfilePage {
            users: accounts.iter().map(PublicProfile::from).collect(),
            cursor: page.cursor(total),
        })
    }

    async fn account(&self, id: Uuid) -> Result<Account> {
        self.resolver
            .store()
            .find_by_id(id)
            .await?
            .ok_or_else(|| FeedError::AccountNotFound(id.to_string()))
    }

    async fn both_directions(&self, address: &str) -> Result<SupportsView> {
        let (supporting, supported) = tokio::try_join!(
            self.graph.supporting(address),
            self.graph.supported(address)
        )?;

        Ok(SupportsView {
            supporting,
            supported,
        })
    }

    // The edge always originates at the caller's own address.
    async fn edge_for(
        &self,
        caller: Uuid,
        address_to: &str,
        claimed_from: Option<&str>,
    ) -> Result<SupportEdge> {
        let address_to = address_to.trim();
        if address_to.is_empty() {
            return Err(FeedError::InvalidInput("addressTo is required".into()));
        }

        let address_from = self.resolver.caller_address(caller).await?;
        if let Some(claimed) = claimed_from {
            if claimed != address_from {
                return Err(FeedError::InvalidInput(
                    "addressFrom must be the caller's own address".into(),
                ));
            }
        }

        Ok(SupportEdge {
            address_from,
            address_to: address_to.to_string(),
        })
    }
}
