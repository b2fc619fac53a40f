//! Request handlers.

pub mod auth;
pub mod browse;
pub mod health;
pub mod profile;

pub use auth::*;
pub use browse::*;
pub use health::*;
pub use profile::*;
