//! Principal store.
//!
//! This crate provides:
//! - The `PrincipalStore` trait through which the API loads accounts
//! - An in-memory implementation used by the server binary and tests

pub mod error;
pub mod memory;
pub mod repo;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryPrincipalStore;
pub use repo::PrincipalStore;
