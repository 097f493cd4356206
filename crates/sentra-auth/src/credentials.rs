//! Local email + password authentication.

use sentra_core::directory::UserDirectory;
use sentra_core::error::{SentraError, SentraResult};
use sentra_core::models::Principal;
use tracing::warn;

use crate::password;

/// Validates local credentials against the directory.
///
/// Generic over the directory implementation so this layer has no
/// dependency on the database crate.
#[derive(Clone)]
pub struct CredentialAuthenticator<U: UserDirectory> {
    users: U,
}

impl<U: UserDirectory> CredentialAuthenticator<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// Authenticate an email + password pair, producing a principal on
    /// success.
    ///
    /// "No such email", "wrong password", and "account disabled" all
    /// collapse into the same `InvalidCredentials` error so callers
    /// cannot enumerate accounts.
    pub async fn authenticate(&self, email: &str, password: &str) -> SentraResult<Principal> {
        let user = match self.users.find_by_email(email).await {
            Ok(user) => user,
            Err(SentraError::NotFound { .. }) => return Err(SentraError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        let matches = password::verify_password(password, &user.password_hash)
            .map_err(SentraError::from)?;
        if !matches {
            return Err(SentraError::InvalidCredentials);
        }

        if !user.enabled {
            warn!(user_id = user.id, "sign-in attempt on disabled account");
            return Err(SentraError::InvalidCredentials);
        }

        Ok(Principal::from(&user))
    }
}
