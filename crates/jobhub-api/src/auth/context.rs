//! Request-scoped security context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use jobhub_models::{Principal, PrincipalView, Role};

use crate::auth::error::AuthError;
use crate::error::ApiError;

/// Who the current request acts as.
///
/// Built by the authentication middleware for exactly one request and stored
/// in that request's extensions. Empty when a public route was called
/// without credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    principal: Option<PrincipalView>,
    authorities: Vec<&'static str>,
}

impl SecurityContext {
    /// Context for an unauthenticated request to a public route.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for a resolved principal.
    pub fn authenticated(principal: &Principal) -> Self {
        Self {
            principal: Some(principal.view()),
            authorities: vec![principal.role.authority()],
        }
    }

    pub fn principal(&self) -> Option<&PrincipalView> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.principal.as_ref().map(|p| p.role)
    }

    pub fn authorities(&self) -> &[&'static str] {
        &self.authorities
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SecurityContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .ok_or_else(|| ApiError::internal("security context missing; authentication layer not installed"))
    }
}

/// Extractor for handlers that need an authenticated principal of any role.
#[derive(Debug, Clone)]
pub struct Authenticated(pub PrincipalView);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let context = SecurityContext::from_request_parts(parts, state).await?;
        context
            .principal
            .map(Authenticated)
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}
