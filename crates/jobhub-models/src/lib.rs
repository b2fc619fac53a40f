//! Shared data models for the JobHub backend.
//!
//! This crate provides Serde-serializable types for:
//! - Principals (user accounts) and their identifiers
//! - The closed set of account roles
//! - The public view of a principal exposed to handlers

pub mod principal;

// Re-export common types
pub use principal::{ParseRoleError, Principal, PrincipalId, PrincipalView, Role};
