//! Stateless bearer-token authentication and role-based authorization.
//!
//! - `token`: HS256 token issuance and validation
//! - `classifier`: public/protected route table
//! - `resolver`: principal lookup by token subject
//! - `middleware`: per-request authentication
//! - `context`: request-scoped security context and extractors
//! - `policy`: role checks for handlers

pub mod classifier;
pub mod context;
pub mod error;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod resolver;
pub mod token;

pub use classifier::{PathMatch, RouteClassifier, RouteRule};
pub use context::{Authenticated, SecurityContext};
pub use error::{AuthError, TokenError};
pub use middleware::{authenticate, extract_credentials, Credentials};
pub use policy::AccessPolicy;
pub use resolver::PrincipalResolver;
pub use token::{Claims, IssuedToken, TokenCodec};
