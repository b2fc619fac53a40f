//! In-memory principal store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use jobhub_models::Principal;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::repo::PrincipalStore;

/// Thread-safe in-memory store keyed by email.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPrincipalStore {
    principals: Arc<RwLock<HashMap<String, Principal>>>,
}

impl InMemoryPrincipalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with principals.
    pub fn with_principals(principals: impl IntoIterator<Item = Principal>) -> Self {
        let map = principals
            .into_iter()
            .map(|p| (p.email.clone(), p))
            .collect();
        Self {
            principals: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored principals.
    pub async fn len(&self) -> usize {
        self.principals.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.principals.read().await.is_empty()
    }
}

#[async_trait]
impl PrincipalStore for InMemoryPrincipalStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Principal>> {
        let principal = self.principals.read().await.get(email).cloned();
        debug!(found = principal.is_some(), "Principal lookup");
        Ok(principal)
    }

    async fn insert(&self, principal: Principal) -> StoreResult<()> {
        let mut principals = self.principals.write().await;
        if principals.contains_key(&principal.email) {
            return Err(StoreError::already_exists(principal.email));
        }
        info!(id = %principal.id, role = %principal.role, "Principal created");
        principals.insert(principal.email.clone(), principal);
        Ok(())
    }

    async fn set_active(&self, email: &str, active: bool) -> StoreResult<()> {
        let mut principals = self.principals.write().await;
        let principal = principals
            .get_mut(email)
            .ok_or_else(|| StoreError::not_found(email))?;
        principal.active = active;
        info!(id = %principal.id, active, "Principal active flag updated");
        Ok(())
    }
}
