//! Axum HTTP API server for the JobHub marketplace.
//!
//! This crate provides:
//! - Stateless HS256 bearer-token issuance and validation
//! - Declarative public/protected route classification
//! - Per-request authentication middleware and role-based access checks
//! - Registration and login with Argon2id password hashing
//! - Rate limiting, security headers and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, AuthConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
