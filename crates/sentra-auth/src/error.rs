//! Authentication error types.

use sentra_core::error::SentraError;
use thiserror::Error;

use crate::token::TokenError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad local credentials. Never says which part was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    /// A federated provider omitted a mandatory attribute.
    #[error("{field} not supplied by the identity provider")]
    IdentityIncomplete { field: &'static str },

    /// The email is registered under a different federated provider.
    #[error("already signed up with a {existing} account, use your {existing} account to sign in")]
    ProviderMismatch { existing: String },

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for SentraError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => SentraError::InvalidCredentials,
            AuthError::Token(e) => SentraError::Token {
                reason: e.to_string(),
            },
            AuthError::IdentityIncomplete { field } => SentraError::IdentityIncomplete { field },
            AuthError::ProviderMismatch { existing } => SentraError::ProviderMismatch { existing },
            AuthError::Crypto(msg) => SentraError::Crypto(msg),
        }
    }
}
