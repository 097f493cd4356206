//! Principal — the request-scoped authenticated identity.

use serde::{Deserialize, Serialize};

use crate::models::role::RoleName;
use crate::models::user::{Provider, User, UserStatus};

/// A resolved, authenticated identity attached to a single request or
/// login exchange. Never persisted; constructed fresh from the
/// directory's current view of the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub picture: String,
    pub provider: Provider,
    pub roles: Vec<RoleName>,
    pub enabled: bool,
    pub status: UserStatus,
}

impl Principal {
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            picture: user.picture.clone(),
            provider: user.provider,
            roles: user.roles.clone(),
            enabled: user.enabled,
            status: user.status,
        }
    }
}
