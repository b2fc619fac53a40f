//! Authentication and authorization failures.

use jobhub_models::Role;
use thiserror::Error;

/// Token codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token cannot be parsed or decoded.
    #[error("token is malformed")]
    Malformed,

    /// The MAC does not match: tampering or a different secret.
    #[error("token signature is invalid")]
    SignatureInvalid,

    /// `now >= exp`.
    #[error("token has expired")]
    Expired,

    /// Signing failed while issuing a token.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// The authentication/authorization taxonomy.
///
/// Everything except `Forbidden`, `AccessDenied` and `Internal` becomes a 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,

    #[error("Invalid or expired token")]
    TokenMalformed,

    #[error("Invalid or expired token")]
    TokenSignatureInvalid,

    #[error("Invalid or expired token")]
    TokenExpired,

    #[error("Account not found or inactive")]
    PrincipalNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{required} role required")]
    Forbidden { required: Role },

    /// No role grants access.
    #[error("Access denied")]
    AccessDenied,

    /// Detail is for server-side logs only.
    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable label used for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::TokenMalformed => "token_malformed",
            AuthError::TokenSignatureInvalid => "token_signature_invalid",
            AuthError::TokenExpired => "token_expired",
            AuthError::PrincipalNotFound => "principal_not_found",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Forbidden { .. } | AuthError::AccessDenied => "forbidden",
            AuthError::Internal(_) => "internal_error",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AuthError::TokenMalformed,
            TokenError::SignatureInvalid => AuthError::TokenSignatureInvalid,
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Encoding(msg) => AuthError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_share_client_message() {
        for err in [TokenError::Malformed, TokenError::SignatureInvalid, TokenError::Expired] {
            assert_eq!(AuthError::from(err).to_string(), "Invalid or expired token");
        }
    }

    #[test]
    fn test_encoding_failure_is_internal() {
        let err = AuthError::from(TokenError::Encoding("boom".into()));
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_forbidden_message_names_role() {
        let err = AuthError::Forbidden { required: Role::Company };
        assert_eq!(err.to_string(), "COMPANY role required");
        assert_eq!(err.outcome(), "forbidden");
    }

    #[test]
    fn test_access_denied_names_no_role() {
        assert_eq!(AuthError::AccessDenied.to_string(), "Access denied");
        assert_eq!(AuthError::AccessDenied.outcome(), "forbidden");
    }
}
