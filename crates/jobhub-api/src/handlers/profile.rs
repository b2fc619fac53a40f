//! Handlers for the caller's own account.

use axum::Json;
use serde::Serialize;

use jobhub_models::{PrincipalView, Role};

use crate::auth::{AccessPolicy, Authenticated, SecurityContext};
use crate::error::ApiResult;

/// Current principal with its authorities.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub principal: PrincipalView,
    pub authorities: Vec<&'static str>,
}

/// Who am I. Any authenticated role.
pub async fn me(Authenticated(principal): Authenticated) -> Json<MeResponse> {
    let authorities = vec![principal.role.authority()];
    Json(MeResponse {
        principal,
        authorities,
    })
}

/// The calling company's own profile.
pub async fn company_me(context: SecurityContext) -> ApiResult<Json<PrincipalView>> {
    let principal = AccessPolicy::require(&context, Role::Company)?;
    Ok(Json(principal.clone()))
}

/// The calling seeker's own profile.
pub async fn seeker_me(context: SecurityContext) -> ApiResult<Json<PrincipalView>> {
    let principal = AccessPolicy::require(&context, Role::Seeker)?;
    Ok(Json(principal.clone()))
}
