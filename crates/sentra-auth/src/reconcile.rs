//! Federated identity reconciliation.
//!
//! Consumes a provider-normalized external identity from a completed
//! OAuth2/OIDC exchange and merges it into the directory: updating the
//! matching account, creating a fresh one, or rejecting the login.

use sentra_core::directory::UserDirectory;
use sentra_core::error::{SentraError, SentraResult};
use sentra_core::models::{ExternalIdentity, NewUser, Principal, Provider, RoleName, User};
use tracing::info;

use crate::password;

/// Length of the generated password backing accounts that only ever
/// sign in through a provider.
const GENERATED_PASSWORD_LEN: usize = 12;

/// Merges external identities into local accounts.
#[derive(Clone)]
pub struct FederatedIdentityReconciler<U: UserDirectory> {
    users: U,
}

impl<U: UserDirectory> FederatedIdentityReconciler<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// Reconcile a federated login against the directory.
    ///
    /// Name and email are mandatory — a provider that withholds either
    /// cannot be linked to an account. An existing account under a
    /// *different* federated provider rejects the login; an existing
    /// `local` account attaches, trusting the provider's attestation
    /// of the email. That trust boundary is accepted policy, not an
    /// oversight.
    pub async fn reconcile(
        &self,
        provider: Provider,
        identity: &ExternalIdentity,
    ) -> SentraResult<Principal> {
        let name = identity
            .name
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(SentraError::IdentityIncomplete { field: "name" })?;
        let email = identity
            .email
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(SentraError::IdentityIncomplete { field: "email" })?;

        match self.users.find_by_email(email).await {
            Ok(existing) => self.attach(existing, provider, name, identity).await,
            Err(SentraError::NotFound { .. }) => {
                match self.register(provider, name, email, identity).await {
                    Ok(principal) => Ok(principal),
                    // Lost a create race for this email: the account
                    // exists now, so fall back to lookup-and-update.
                    Err(SentraError::AlreadyExists { .. }) => {
                        let existing = self.users.find_by_email(email).await?;
                        self.attach(existing, provider, name, identity).await
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Update an existing account from fresh provider attributes. The
    /// recorded provider never changes here.
    async fn attach(
        &self,
        existing: User,
        provider: Provider,
        name: &str,
        identity: &ExternalIdentity,
    ) -> SentraResult<Principal> {
        if existing.provider != provider && existing.provider != Provider::Local {
            return Err(SentraError::ProviderMismatch {
                existing: existing.provider.to_string(),
            });
        }

        let updated = self
            .users
            .update(
                existing.id,
                sentra_core::models::UserUpdate {
                    display_name: Some(name.to_owned()),
                    picture: identity.picture.clone(),
                    ..Default::default()
                },
            )
            .await?;

        Ok(Principal::from(&updated))
    }

    /// First login under this email: create an enabled account owned
    /// by the current provider, with the default role and a random
    /// password.
    async fn register(
        &self,
        provider: Provider,
        name: &str,
        email: &str,
        identity: &ExternalIdentity,
    ) -> SentraResult<Principal> {
        let user = self
            .users
            .create(NewUser {
                email: email.to_owned(),
                display_name: name.to_owned(),
                picture: identity.picture.clone(),
                password: password::generate_password(GENERATED_PASSWORD_LEN),
                provider,
                provider_user_id: identity.provider_user_id.clone(),
                roles: vec![RoleName::User],
            })
            .await?;

        info!(user_id = user.id, %provider, "registered federated user");
        Ok(Principal::from(&user))
    }
}
