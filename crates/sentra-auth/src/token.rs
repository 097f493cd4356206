//! Signed session token issuance and verification.
//!
//! Tokens are self-contained: the claim set carries everything needed
//! to name the caller, signed with HMAC-SHA-512 over a shared secret.
//! There is no server-side token storage — validity is purely a
//! function of signature and expiry, so an issued token stays valid
//! until its encoded expiry unless the signing key changes.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use sentra_core::models::{Principal, Provider};

use crate::config::AuthConfig;

/// HMAC-SHA-512 wants a key of at least the hash's output size.
pub const MIN_SECRET_BYTES: usize = 64;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token signature")]
    Signature,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("signing secret is {got} bytes, HMAC-SHA-512 requires at least {MIN_SECRET_BYTES}")]
    WeakSecret { got: usize },
}

/// Claim set encoded inside every token. Field names and the
/// epoch-millisecond `iat`/`exp` are wire-compatible surface; do not
/// rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string.
    pub sub: String,
    /// Issued-at, epoch milliseconds.
    pub iat: i64,
    /// Expiry, epoch milliseconds.
    pub exp: i64,
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub provider: Provider,
    pub roles: Vec<String>,
    pub picture: String,
}

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_ms: i64,
}

impl TokenCodec {
    /// Build a codec from a raw secret and a token lifetime in
    /// milliseconds. Rejects secrets too short for HMAC-SHA-512.
    pub fn new(secret: &[u8], ttl_ms: u64) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenError::WeakSecret { got: secret.len() });
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_ms: ttl_ms as i64,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, TokenError> {
        Self::new(config.token_secret.as_bytes(), config.token_ttl_ms)
    }

    /// Issue a token for an authenticated principal. Pure computation,
    /// no side effects.
    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        let now = Utc::now().timestamp_millis();
        let claims = Claims {
            sub: principal.id.to_string(),
            iat: now,
            exp: now + self.ttl_ms,
            email: principal.email.clone(),
            display_name: principal.display_name.clone(),
            provider: principal.provider,
            roles: principal.roles.iter().map(|r| r.to_string()).collect(),
            picture: principal.picture.clone(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS512), &claims, &self.encoding)
            .map_err(|e| TokenError::Malformed(e.to_string()))
    }

    /// Check signature and expiry. Returns `false` on any failure —
    /// parse error, bad signature, or expired — logging the cause
    /// without distinguishing it to the caller.
    pub fn validate(&self, token: &str) -> bool {
        match self.verified_claims(token) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "rejected token");
                false
            }
        }
    }

    /// Parse the claims of a token assumed already validated. Callers
    /// must run [`validate`](Self::validate) first; an invalid token
    /// fails here with [`TokenError`].
    pub fn claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.verified_claims(token)
    }

    fn verified_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        // `exp` is epoch milliseconds for wire compatibility; the
        // library checks seconds, so expiry is enforced by hand below.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::Signature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        if claims.exp <= Utc::now().timestamp_millis() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentra_core::models::{RoleName, UserStatus};

    const TEST_SECRET: &[u8] = b"0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn test_principal() -> Principal {
        Principal {
            id: 42,
            email: "alice@example.com".into(),
            display_name: "Alice".into(),
            picture: "//example.com/alice.png".into(),
            provider: Provider::Google,
            roles: vec![RoleName::User, RoleName::Moderator],
            enabled: true,
            status: UserStatus::Active,
        }
    }

    #[test]
    fn rejects_short_secret() {
        let result = TokenCodec::new(b"too-short", 1000);
        assert!(matches!(result, Err(TokenError::WeakSecret { got: 9 })));
    }

    #[test]
    fn roundtrip_preserves_claims() {
        let codec = TokenCodec::new(TEST_SECRET, 60_000).unwrap();
        let principal = test_principal();

        let token = codec.issue(&principal).unwrap();
        assert!(codec.validate(&token));

        let claims = codec.claims(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.display_name, "Alice");
        assert_eq!(claims.provider, Provider::Google);
        assert_eq!(claims.roles, vec!["USER".to_string(), "MODERATOR".to_string()]);
        assert_eq!(claims.picture, "//example.com/alice.png");
        assert_eq!(claims.exp, claims.iat + 60_000);
    }

    #[test]
    fn expired_token_fails_validation() {
        // Zero lifetime: exp == iat, already in the past.
        let codec = TokenCodec::new(TEST_SECRET, 0).unwrap();
        let token = codec.issue(&test_principal()).unwrap();

        assert!(!codec.validate(&token));
        assert!(matches!(codec.claims(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn tampered_signature_fails_validation() {
        let codec = TokenCodec::new(TEST_SECRET, 60_000).unwrap();
        let token = codec.issue(&test_principal()).unwrap();

        // Flip the last character of the signature segment.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(!codec.validate(&tampered));
        assert!(codec.claims(&tampered).is_err());
    }

    #[test]
    fn different_secret_fails_validation() {
        let codec = TokenCodec::new(TEST_SECRET, 60_000).unwrap();
        let other = TokenCodec::new(
            b"fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210",
            60_000,
        )
        .unwrap();

        let token = codec.issue(&test_principal()).unwrap();
        assert!(!other.validate(&token));
    }

    #[test]
    fn garbage_fails_validation() {
        let codec = TokenCodec::new(TEST_SECRET, 60_000).unwrap();
        assert!(!codec.validate("not-a-token"));
        assert!(codec.claims("not-a-token").is_err());
    }
}
