//! Application state.

use std::sync::Arc;

use jobhub_store::PrincipalStore;

use crate::auth::{PrincipalResolver, RouteClassifier, TokenCodec};
use crate::config::ApiConfig;

/// Shared application state.
///
/// Everything here is immutable after startup except what the principal
/// store and resolver cache manage internally.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub tokens: Arc<TokenCodec>,
    pub routes: Arc<RouteClassifier>,
    pub resolver: PrincipalResolver,
    pub principals: Arc<dyn PrincipalStore>,
}

impl AppState {
    /// Create application state over the given principal store.
    pub fn new(config: ApiConfig, principals: Arc<dyn PrincipalStore>) -> Self {
        let tokens = TokenCodec::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl);
        let routes = RouteClassifier::new(config.auth.route_rules.clone());
        let resolver =
            PrincipalResolver::with_cache(Arc::clone(&principals), config.auth.principal_cache_ttl);

        Self {
            config,
            tokens: Arc::new(tokens),
            routes: Arc::new(routes),
            resolver,
            principals,
        }
    }
}
