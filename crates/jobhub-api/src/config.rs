//! API configuration.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::auth::classifier::{RouteClassifier, RouteRule};

/// Minimum HMAC secret length accepted in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Default token lifetime (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set")]
    MissingSecret,

    #[error("JWT_SECRET must be at least {MIN_PRODUCTION_SECRET_LEN} bytes in production")]
    WeakSecret,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid route rule '{0}': paths must start with '/'")]
    InvalidRouteRule(String),
}

/// Authentication configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC signing secret. Never logged.
    pub jwt_secret: String,
    /// Issued token lifetime.
    pub token_ttl: Duration,
    /// Principal resolver cache TTL; zero disables the cache.
    pub principal_cache_ttl: Duration,
    /// Ordered public/protected route rules.
    pub route_rules: Vec<RouteRule>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("principal_cache_ttl", &self.principal_cache_ttl)
            .field("route_rules", &self.route_rules)
            .finish()
    }
}

impl AuthConfig {
    /// Build an auth config with the default route table.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            principal_cache_ttl: Duration::ZERO,
            route_rules: RouteClassifier::marketplace_defaults().rules().to_vec(),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Per-IP rate limit for the login/register endpoints
    pub rate_limit_rps: u32,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    pub auth: AuthConfig,
}

impl ApiConfig {
    /// Development defaults around the given secret.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            max_body_size: 1024 * 1024, // 1MB
            environment: "development".to_string(),
            auth: AuthConfig::new(jwt_secret),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?;
        if environment.eq_ignore_ascii_case("production")
            && jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(ConfigError::WeakSecret);
        }

        let route_rules = match lookup("PUBLIC_ROUTES") {
            Some(raw) => RouteRule::parse_list(&raw)?,
            None => RouteClassifier::marketplace_defaults().rules().to_vec(),
        };

        Ok(Self {
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("API_PORT", &lookup, 8000)?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| vec!["*".to_string()]),
            rate_limit_rps: parse_or("RATE_LIMIT_RPS", &lookup, 10)?,
            max_body_size: parse_or("MAX_BODY_SIZE", &lookup, 1024 * 1024)?,
            environment,
            auth: AuthConfig {
                jwt_secret,
                token_ttl: Duration::from_secs(parse_or(
                    "JWT_TTL_SECS",
                    &lookup,
                    DEFAULT_TOKEN_TTL_SECS,
                )?),
                principal_cache_ttl: Duration::from_secs(parse_or(
                    "PRINCIPAL_CACHE_TTL_SECS",
                    &lookup,
                    0,
                )?),
                route_rules,
            },
        })
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
