//! Argon2id password hashing.

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use tracing::warn;

use crate::auth::error::AuthError;

/// Stand-in hash verified when no account matches, so a failed login costs
/// one Argon2 verification whether or not the account exists.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("jobhub-no-such-account").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to compute dummy password hash");
        String::new()
    })
});

/// Hash a password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::internal(format!("password hashing failed: {}", e)))
}

/// Check a password against a stored PHC string. Unparseable hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Check a password against the account's hash, or against [`DUMMY_HASH`]
/// when there is no account. The dummy comparison never succeeds.
pub fn verify_password_or_dummy(password: &str, hash: Option<&str>) -> bool {
    verify_with(password, hash, verify_password)
}

fn verify_with(password: &str, hash: Option<&str>, verify: impl FnOnce(&str, &str) -> bool) -> bool {
    match hash {
        Some(hash) => verify(password, hash),
        None => {
            verify(password, DUMMY_HASH.as_str());
            false
        }
    }
}
