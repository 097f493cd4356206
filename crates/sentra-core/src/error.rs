//! Error types shared across the Sentra system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentraError {
    /// Local credential check failed. Deliberately carries no detail:
    /// "no such email" and "wrong password" must be indistinguishable
    /// to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token: {reason}")]
    Token { reason: String },

    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: String, key: String },

    /// The email is already registered under a different federated
    /// provider. The message names the original provider so the caller
    /// can be told which account to use.
    #[error("already signed up with a {existing} account, use your {existing} account to sign in")]
    ProviderMismatch { existing: String },

    #[error("{field} not supplied by the identity provider")]
    IdentityIncomplete { field: &'static str },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    #[error("validation failed: {message}")]
    Validation { message: String },

    /// The federated provider's token or userinfo endpoint failed
    /// during the code exchange.
    #[error("identity provider error: {0}")]
    ProviderExchange(String),

    #[error("directory error: {0}")]
    Directory(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

pub type SentraResult<T> = Result<T, SentraError>;
