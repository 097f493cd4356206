//! Sentra Auth — signed bearer tokens, local and federated
//! authentication, and role-based access decisions.
//!
//! Everything here is generic over the directory traits from
//! `sentra-core`; this crate has no dependency on the database crate.

pub mod config;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod interceptor;
pub mod password;
pub mod policy;
pub mod reconcile;
pub mod token;

pub use config::AuthConfig;
pub use credentials::CredentialAuthenticator;
pub use error::AuthError;
pub use interceptor::resolve_principal;
pub use policy::AccessRequirement;
pub use reconcile::FederatedIdentityReconciler;
pub use token::{Claims, TokenCodec, TokenError};
