//! Principal lookup by token subject.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use jobhub_models::Principal;
use jobhub_store::{PrincipalStore, StoreError, StoreResult};

use crate::auth::error::AuthError;

/// Maximum number of cached principals.
const MAX_CACHE_ENTRIES: usize = 10_000;

/// Resolved principal with its insertion time.
struct CachedPrincipal {
    principal: Principal,
    cached_at: Instant,
}

/// Short-TTL principal cache.
struct PrincipalCache {
    entries: RwLock<HashMap<String, CachedPrincipal>>,
    ttl: Duration,
}

impl PrincipalCache {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    async fn get(&self, subject: &str) -> Option<Principal> {
        let entries = self.entries.read().await;
        entries
            .get(subject)
            .filter(|entry| entry.cached_at.elapsed() < self.ttl)
            .map(|entry| entry.principal.clone())
    }

    async fn insert(&self, principal: Principal) {
        let mut entries = self.entries.write().await;
        if entries.len() >= MAX_CACHE_ENTRIES {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.cached_at.elapsed() < ttl);
            if entries.len() >= MAX_CACHE_ENTRIES {
                entries.clear();
            }
        }
        entries.insert(
            principal.email.clone(),
            CachedPrincipal {
                principal,
                cached_at: Instant::now(),
            },
        );
    }

    async fn remove(&self, subject: &str) {
        self.entries.write().await.remove(subject);
    }
}

/// Loads the principal a validated token's subject refers to.
///
/// Inactive accounts resolve as not found. With a non-zero cache TTL,
/// positive lookups are cached; [`PrincipalResolver::deactivate`] evicts the
/// entry so the account stops authenticating immediately.
#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<dyn PrincipalStore>,
    cache: Option<Arc<PrincipalCache>>,
}

impl PrincipalResolver {
    /// Resolver with no cache.
    pub fn new(store: Arc<dyn PrincipalStore>) -> Self {
        Self { store, cache: None }
    }

    /// Resolver with a short-TTL cache. A zero TTL disables caching.
    pub fn with_cache(store: Arc<dyn PrincipalStore>, ttl: Duration) -> Self {
        let cache = (!ttl.is_zero()).then(|| Arc::new(PrincipalCache::new(ttl)));
        Self { store, cache }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn PrincipalStore> {
        &self.store
    }

    /// Resolve `subject` to an active principal.
    pub async fn resolve(&self, subject: &str) -> Result<Principal, AuthError> {
        if let Some(cache) = &self.cache {
            if let Some(principal) = cache.get(subject).await {
                debug!(id = %principal.id, "Principal resolved from cache");
                return Ok(principal);
            }
        }

        let principal = match self.store.find_by_email(subject).await {
            Ok(Some(principal)) => principal,
            Ok(None) | Err(StoreError::NotFound(_)) => return Err(AuthError::PrincipalNotFound),
            Err(e) => {
                error!(error = %e, "Principal store lookup failed");
                return Err(AuthError::internal(e.to_string()));
            }
        };

        if !principal.active {
            debug!(id = %principal.id, "Principal is inactive");
            self.invalidate(subject).await;
            return Err(AuthError::PrincipalNotFound);
        }

        if let Some(cache) = &self.cache {
            cache.insert(principal.clone()).await;
        }

        Ok(principal)
    }

    /// Drop any cached entry for `subject`.
    pub async fn invalidate(&self, subject: &str) {
        if let Some(cache) = &self.cache {
            cache.remove(subject).await;
        }
    }

    /// Deactivate an account in the store and evict it from the cache.
    pub async fn deactivate(&self, subject: &str) -> StoreResult<()> {
        self.store.set_active(subject, false).await?;
        self.invalidate(subject).await;
        info!("Principal deactivated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use jobhub_models::Role;
    use jobhub_store::InMemoryPrincipalStore;

    use super::*;

    struct FailingStore;

    #[async_trait]
    impl PrincipalStore for FailingStore {
        async fn find_by_email(&self, _email: &str) -> StoreResult<Option<Principal>> {
            Err(StoreError::unavailable("connection refused"))
        }

        async fn insert(&self, _principal: Principal) -> StoreResult<()> {
            Err(StoreError::unavailable("connection refused"))
        }

        async fn set_active(&self, _email: &str, _active: bool) -> StoreResult<()> {
            Err(StoreError::unavailable("connection refused"))
        }
    }

    fn store_with(email: &str, role: Role) -> InMemoryPrincipalStore {
        InMemoryPrincipalStore::with_principals([Principal::new(email, "hash", role)])
    }

    #[tokio::test]
    async fn test_resolve_existing() {
        let resolver = PrincipalResolver::new(Arc::new(store_with("a@x.com", Role::Seeker)));
        let principal = resolver.resolve("a@x.com").await.unwrap();
        assert_eq!(principal.role, Role::Seeker);
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let resolver = PrincipalResolver::new(Arc::new(InMemoryPrincipalStore::new()));
        assert_eq!(
            resolver.resolve("ghost@x.com").await.unwrap_err(),
            AuthError::PrincipalNotFound
        );
    }

    #[tokio::test]
    async fn test_inactive_principal_not_resolved() {
        let store = store_with("a@x.com", Role::Company);
        store.set_active("a@x.com", false).await.unwrap();
        let resolver = PrincipalResolver::new(Arc::new(store));
        assert_eq!(
            resolver.resolve("a@x.com").await.unwrap_err(),
            AuthError::PrincipalNotFound
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let resolver = PrincipalResolver::new(Arc::new(FailingStore));
        assert!(matches!(
            resolver.resolve("a@x.com").await.unwrap_err(),
            AuthError::Internal(_)
        ));
    }

    #[tokio::test]
    async fn test_cache_serves_repeat_lookups() {
        let store = store_with("a@x.com", Role::Seeker);
        let resolver =
            PrincipalResolver::with_cache(Arc::new(store.clone()), Duration::from_secs(60));
        resolver.resolve("a@x.com").await.unwrap();

        // Deactivated behind the resolver's back: the cached entry still serves.
        store.set_active("a@x.com", false).await.unwrap();
        assert!(resolver.resolve("a@x.com").await.is_ok());

        resolver.invalidate("a@x.com").await;
        assert_eq!(
            resolver.resolve("a@x.com").await.unwrap_err(),
            AuthError::PrincipalNotFound
        );
    }

    #[tokio::test]
    async fn test_deactivate_evicts_cache() {
        let store = store_with("a@x.com", Role::Seeker);
        let resolver =
            PrincipalResolver::with_cache(Arc::new(store.clone()), Duration::from_secs(60));
        resolver.resolve("a@x.com").await.unwrap();

        resolver.deactivate("a@x.com").await.unwrap();
        assert_eq!(
            resolver.resolve("a@x.com").await.unwrap_err(),
            AuthError::PrincipalNotFound
        );
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let store = store_with("a@x.com", Role::Seeker);
        let resolver = PrincipalResolver::with_cache(Arc::new(store.clone()), Duration::ZERO);
        resolver.resolve("a@x.com").await.unwrap();
        store.set_active("a@x.com", false).await.unwrap();
        assert!(resolver.resolve("a@x.com").await.is_err());
    }
}
