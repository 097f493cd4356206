//! External identity — the normalized shape of a federated login.

use serde::{Deserialize, Serialize};

/// Attributes asserted by an OAuth2/OIDC provider about the caller,
/// normalized to one shape regardless of provider. Transient: always
/// reconciled into a [`User`](crate::models::User) before use, never
/// persisted as-is.
///
/// All fields are optional because providers differ in what they
/// release; the reconciler enforces which ones are mandatory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// The provider-side account id (`sub` for OIDC providers).
    pub provider_user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}
