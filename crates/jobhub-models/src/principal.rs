//! Principal (user account) models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub String);

impl PrincipalId {
    /// Generate a new random principal ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PrincipalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PrincipalId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Account role. The set is closed; every role check matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Job seeker.
    Seeker,
    /// Hiring company.
    Company,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Seeker => "SEEKER",
            Role::Company => "COMPANY",
        }
    }

    /// Authority string derived from the role (`ROLE_SEEKER`, `ROLE_COMPANY`).
    pub fn authority(&self) -> &'static str {
        match self {
            Role::Seeker => "ROLE_SEEKER",
            Role::Company => "ROLE_COMPANY",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SEEKER" => Ok(Role::Seeker),
            "COMPANY" => Ok(Role::Company),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

/// A user account as held by the principal store.
///
/// The email doubles as the bearer-token subject, so it must be unique
/// within a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: String,
    /// Argon2 PHC string. Never serialized into responses; see [`PrincipalView`].
    pub password_hash: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Principal {
    /// Create a new active principal.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            id: PrincipalId::new(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Public view without credential material.
    pub fn view(&self) -> PrincipalView {
        PrincipalView {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// What downstream handlers are allowed to see of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalView {
    pub id: PrincipalId,
    pub email: String,
    pub role: Role,
}
