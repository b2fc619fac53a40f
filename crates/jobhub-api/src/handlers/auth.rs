//! Registration and login handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use jobhub_models::{Principal, PrincipalView, Role};

use crate::auth::password::{hash_password, verify_password_or_dummy};
use crate::auth::{AuthError, IssuedToken};
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be 8 to 128 characters"))]
    pub password: String,
    pub role: Role,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub principal: PrincipalView,
}

impl TokenResponse {
    fn new(issued: IssuedToken, principal: &Principal) -> Self {
        Self {
            token: issued.token,
            token_type: "Bearer",
            expires_at: issued.expires_at,
            principal: principal.view(),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Register a new account and issue its first token.
pub async fn register(
    State(state): State<AppState>,
    Json(mut request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    request.email = normalize_email(&request.email);
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let email = request.email;
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(format!("hashing task failed: {}", e)))??;

    let principal = Principal::new(email, password_hash, request.role);
    state.principals.insert(principal.clone()).await?;

    let issued = state.tokens.issue(&principal).map_err(AuthError::from)?;
    metrics::record_token_issued("register");
    info!(id = %principal.id, role = %principal.role, "Account registered");

    Ok((StatusCode::CREATED, Json(TokenResponse::new(issued, &principal))))
}

/// Exchange email and password for a token.
///
/// Unknown accounts, wrong passwords and inactive accounts all fail the
/// same way.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let email = normalize_email(&request.email);

    let principal = state
        .principals
        .find_by_email(&email)
        .await?
        .filter(|p| p.active);

    let password = request.password;
    let hash = principal.as_ref().map(|p| p.password_hash.clone());
    let verified =
        tokio::task::spawn_blocking(move || verify_password_or_dummy(&password, hash.as_deref()))
            .await
            .map_err(|e| ApiError::internal(format!("hashing task failed: {}", e)))?;

    let principal = match principal {
        Some(principal) if verified => principal,
        _ => return Err(AuthError::InvalidCredentials.into()),
    };

    let issued = state.tokens.issue(&principal).map_err(AuthError::from)?;
    metrics::record_token_issued("login");
    info!(id = %principal.id, "Login succeeded");

    Ok(Json(TokenResponse::new(issued, &principal)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_email_validates_once_normalized() {
        let mut request = RegisterRequest {
            email: " New@X.com ".to_string(),
            password: "long enough pw".to_string(),
            role: Role::Company,
        };
        assert!(request.validate().is_err());

        request.email = normalize_email(&request.email);
        assert_eq!(request.email, "new@x.com");
        assert!(request.validate().is_ok());
    }
}
