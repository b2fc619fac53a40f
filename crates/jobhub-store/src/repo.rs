//! Principal store interface.

use async_trait::async_trait;
use jobhub_models::Principal;

use crate::error::StoreResult;

/// Backing store for user accounts.
///
/// Lookups are keyed by email, which is also the bearer-token subject.
/// Implementations bound their own latency; callers add no timeout.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Load a principal by email. `Ok(None)` when no such account exists.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Principal>>;

    /// Insert a new principal. Fails with `AlreadyExists` on a duplicate email.
    async fn insert(&self, principal: Principal) -> StoreResult<()>;

    /// Activate or deactivate an account.
    async fn set_active(&self, email: &str, active: bool) -> StoreResult<()>;

    /// Cheap liveness probe used by the readiness endpoint.
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
