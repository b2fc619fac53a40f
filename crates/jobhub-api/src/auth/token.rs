//! Bearer token issuance and validation.
//!
//! Tokens are HS256 JWTs carrying `sub` (the principal's email), `iat` and
//! `exp`. Nothing is stored server-side: a token is valid exactly when its
//! signature verifies under the process secret and `now < exp`.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use jobhub_models::Principal;

use crate::auth::error::TokenError;

/// Upper bound on the configured token lifetime (10 years).
const MAX_TOKEN_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 3600);

/// Signed token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal email)
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }
}

/// A freshly issued token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates bearer tokens with a single process-wide secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec for the given secret and token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        // Expiry is checked by hand so the boundary is strict and the clock
        // can be supplied by the caller.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: chrono::Duration::from_std(ttl.min(MAX_TOKEN_TTL))
                .unwrap_or_else(|_| chrono::Duration::days(3650)),
            validation,
        }
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Issue a token for `principal`, valid from now for the configured TTL.
    pub fn issue(&self, principal: &Principal) -> Result<IssuedToken, TokenError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issue a token as of `now`. Identical inputs produce identical tokens.
    pub fn issue_at(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Encoding("expiry out of range".to_string()))?;
        let claims = Claims {
            sub: principal.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`.
    ///
    /// The signature is verified before any claim is read; a token whose
    /// `exp` is at or before `now` is expired.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }

    /// Read the subject of a token that has already passed [`validate`].
    ///
    /// The signature is not checked again.
    ///
    /// [`validate`]: TokenCodec::validate
    pub fn subject(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = self.validation.clone();
        validation.insecure_disable_signature_validation();
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .map_err(|_| TokenError::Malformed)
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureInvalid,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use jobhub_models::Role;

    use super::*;

    const SECRET: &[u8] = b"test-secret-that-is-long-enough-for-hs256";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::from_secs(3600))
    }

    fn principal(email: &str) -> Principal {
        Principal::new(email, "hash", Role::Seeker)
    }

    fn at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let codec = codec();
        let issued = codec.issue(&principal("a@x.com")).unwrap();
        let claims = codec.validate(&issued.token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(codec.subject(&issued.token).unwrap(), "a@x.com");
    }

    #[test]
    fn test_issue_is_deterministic_for_same_timestamp() {
        let codec = codec();
        let p = principal("a@x.com");
        let a = codec.issue_at(&p, at(1_700_000_000)).unwrap();
        let b = codec.issue_at(&p, at(1_700_000_000)).unwrap();
        assert_eq!(a.token, b.token);
        assert_eq!(a.expires_at, at(1_700_003_600));
    }

    #[test]
    fn test_expiry_after_clock_advance() {
        let codec = codec();
        let issued_at = at(1_700_000_000);
        let issued = codec.issue_at(&principal("a@x.com"), issued_at).unwrap();

        let claims = codec.validate_at(&issued.token, issued_at).unwrap();
        assert_eq!(claims.subject(), "a@x.com");

        let later = issued_at + chrono::Duration::hours(2);
        assert_eq!(codec.validate_at(&issued.token, later), Err(TokenError::Expired));
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let codec = codec();
        let issued_at = at(1_700_000_000);
        let issued = codec.issue_at(&principal("a@x.com"), issued_at).unwrap();

        assert!(codec.validate_at(&issued.token, at(1_700_003_599)).is_ok());
        assert_eq!(
            codec.validate_at(&issued.token, at(1_700_003_600)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_token_issued_in_the_past_is_expired() {
        let codec = codec();
        let issued = codec
            .issue_at(&principal("a@x.com"), Utc::now() - chrono::Duration::days(2))
            .unwrap();
        assert_eq!(codec.validate(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn test_signature_tampering_detected_at_every_position() {
        let codec = codec();
        let issued = codec.issue(&principal("a@x.com")).unwrap();
        let (message, signature) = issued.token.rsplit_once('.').unwrap();

        for i in 0..signature.len() {
            let mut bytes = signature.as_bytes().to_vec();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = format!("{}.{}", message, String::from_utf8(bytes).unwrap());
            assert_eq!(
                codec.validate(&tampered),
                Err(TokenError::SignatureInvalid),
                "flip at {i}"
            );
        }
    }

    #[test]
    fn test_payload_tampering_detected() {
        let codec = codec();
        let issued = codec.issue(&principal("a@x.com")).unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();

        // Payload for another subject, lifted from a token signed elsewhere.
        let forger = TokenCodec::new(b"forger", Duration::from_secs(3600));
        let forged = forger.issue(&principal("admin@x.com")).unwrap();
        let forged_payload = forged.token.split('.').nth(1).unwrap();
        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(codec.validate(&tampered), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = codec().issue(&principal("a@x.com")).unwrap();
        let other = TokenCodec::new(b"another-secret", Duration::from_secs(3600));
        assert_eq!(other.validate(&issued.token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = codec();
        for token in ["", "abc", "a.b", "a.b.c", "not a token at all", "...."] {
            assert_eq!(codec.validate(token), Err(TokenError::Malformed), "{token:?}");
        }
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let codec = codec();
        let claims = Claims {
            sub: "a@x.com".into(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(codec.validate(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_missing_claims_are_malformed() {
        #[derive(Serialize)]
        struct NoIat {
            sub: String,
            exp: i64,
        }
        let codec = codec();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoIat {
                sub: "a@x.com".into(),
                exp: Utc::now().timestamp() + 3600,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(codec.validate(&token), Err(TokenError::Malformed));
    }
}
