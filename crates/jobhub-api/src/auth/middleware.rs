//! Per-request authentication.
//!
//! Every request passes through [`authenticate`] before routing reaches a
//! handler:
//!
//! 1. No `Authorization: Bearer <token>` header: public routes are forwarded
//!    with an empty [`SecurityContext`], protected routes get a 401.
//! 2. A bearer token is present: it must validate and its subject must
//!    resolve to an active principal, on any route. Otherwise 401.
//! 3. The resolved principal is placed in a fresh context in the request's
//!    extensions and the request is forwarded.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Request, Response};
use axum::middleware::Next;
use axum::response::IntoResponse;
use tracing::{debug, error, warn};

use crate::auth::context::SecurityContext;
use crate::auth::error::AuthError;
use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

const BEARER_PREFIX: &[u8] = b"Bearer ";

/// Credentials carried by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials<'a> {
    /// No header, or a scheme other than `Bearer`.
    Missing,
    /// The raw token after `Bearer `.
    Bearer(&'a str),
    /// A `Bearer ` header whose token is not valid UTF-8.
    Unreadable,
}

/// Read bearer credentials from the `Authorization` header.
///
/// The scheme is matched on raw bytes so a bearer header with an
/// undecodable token is still reported as a token, never as absent.
pub fn extract_credentials(headers: &HeaderMap) -> Credentials<'_> {
    let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.as_bytes().strip_prefix(BEARER_PREFIX))
    else {
        return Credentials::Missing;
    };

    match std::str::from_utf8(token) {
        Ok(token) => Credentials::Bearer(token),
        Err(_) => Credentials::Unreadable,
    }
}

/// Decide the security context for a request, or why it is rejected.
pub async fn authenticate_request(
    state: &AppState,
    path: &str,
    headers: &HeaderMap,
) -> Result<SecurityContext, AuthError> {
    let token = match extract_credentials(headers) {
        Credentials::Missing if state.routes.is_public(path) => {
            return Ok(SecurityContext::anonymous());
        }
        Credentials::Missing => return Err(AuthError::MissingToken),
        Credentials::Unreadable => return Err(AuthError::TokenMalformed),
        Credentials::Bearer(token) => token,
    };

    let claims = state.tokens.validate(token)?;
    let principal = state.resolver.resolve(claims.subject()).await?;

    Ok(SecurityContext::authenticated(&principal))
}

/// Authentication middleware.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let path = request.uri().path().to_string();

    match authenticate_request(&state, &path, request.headers()).await {
        Ok(context) => {
            let outcome = if context.is_authenticated() {
                "authenticated"
            } else {
                "anonymous"
            };
            debug!(path = %path, outcome, "Request authenticated");
            metrics::record_auth_decision(outcome);

            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(err) => {
            match &err {
                AuthError::Internal(detail) => {
                    error!(path = %path, error = %detail, "Authentication failed internally")
                }
                _ => warn!(path = %path, outcome = err.outcome(), "Request rejected"),
            }
            metrics::record_auth_decision(err.outcome());
            ApiError::from(err).into_response()
        }
    }
}
