//! Public browsing endpoints.
//!
//! Listings are served by the marketplace's catalogue services; these
//! handlers expose the routes and report who is browsing.

use axum::Json;
use serde::Serialize;

use jobhub_models::PrincipalView;

use crate::auth::SecurityContext;

/// Listing response.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub items: Vec<serde_json::Value>,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<PrincipalView>,
}

impl ListingResponse {
    fn empty_for(context: &SecurityContext) -> Self {
        Self {
            items: Vec::new(),
            authenticated: context.is_authenticated(),
            viewer: context.principal().cloned(),
        }
    }
}

/// Shared handler for the public job-post, company, statistics and
/// recommendation listings.
pub async fn browse(context: SecurityContext) -> Json<ListingResponse> {
    Json(ListingResponse::empty_for(&context))
}
