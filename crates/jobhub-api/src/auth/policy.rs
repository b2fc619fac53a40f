//! Role-based access checks for handlers.

use jobhub_models::{PrincipalView, Role};

use crate::auth::context::SecurityContext;
use crate::auth::error::AuthError;

/// Endpoint-level access policy.
///
/// A pure predicate over the already-resolved context; tokens are never
/// looked at again here.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    /// Require the principal to hold `role`. An empty context is forbidden.
    pub fn require(context: &SecurityContext, role: Role) -> Result<&PrincipalView, AuthError> {
        Self::require_any(context, &[role])
    }

    /// Require the principal to hold one of `roles`. An empty `roles` admits
    /// nobody and is reported as [`AuthError::AccessDenied`].
    pub fn require_any<'a>(
        context: &'a SecurityContext,
        roles: &[Role],
    ) -> Result<&'a PrincipalView, AuthError> {
        let forbidden = || match roles.first() {
            Some(&required) => AuthError::Forbidden { required },
            None => AuthError::AccessDenied,
        };
        let principal = context.principal().ok_or_else(forbidden)?;
        if roles.contains(&principal.role) {
            Ok(principal)
        } else {
            Err(forbidden())
        }
    }

    /// Require any authenticated principal; an empty context is a 401.
    pub fn authenticated(context: &SecurityContext) -> Result<&PrincipalView, AuthError> {
        context.principal().ok_or(AuthError::MissingToken)
    }
}
