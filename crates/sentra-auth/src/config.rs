//! Authentication configuration.

/// Configuration for token issuance. Both values are externally
/// supplied — there are no built-in defaults for the secret.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HMAC-SHA-512 signing secret. Must be at least 64 bytes;
    /// [`TokenCodec::new`](crate::token::TokenCodec::new) rejects
    /// anything shorter.
    pub token_secret: String,
    /// Token lifetime in milliseconds (default: 86_400_000 = 24 hours).
    pub token_ttl_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            token_ttl_ms: 86_400_000,
        }
    }
}
