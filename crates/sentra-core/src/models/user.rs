//! User domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::role::RoleName;

/// Placeholder avatar assigned when a user has no picture of their own.
pub const DEFAULT_PICTURE: &str = "//ssl.gstatic.com/accounts/ui/avatar_2x.png";

/// Which authentication authority owns an account's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Local,
    Google,
    Facebook,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::Google => "google",
            Provider::Facebook => "facebook",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Provider::Local),
            "google" => Ok(Provider::Google),
            "facebook" => Ok(Provider::Facebook),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    Disconnected,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Disconnected => "DISCONNECTED",
            UserStatus::Suspended => "SUSPENDED",
        }
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(UserStatus::Active),
            "DISCONNECTED" => Ok(UserStatus::Disconnected),
            "SUSPENDED" => Ok(UserStatus::Suspended),
            other => Err(format!("unknown user status: {other}")),
        }
    }
}

/// An identity record. Owned exclusively by the user directory — the
/// auth components read it and mutate it only through directory calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the directory on creation, immutable thereafter.
    pub id: i64,
    /// Unique; stored and compared case-sensitively.
    pub email: String,
    pub display_name: String,
    pub picture: String,
    /// Argon2id PHC string. Federated-only accounts carry a hash of a
    /// generated random password that is never handed out.
    pub password_hash: String,
    pub provider: Provider,
    /// The provider-side account id for federated accounts.
    pub provider_user_id: Option<String>,
    /// Non-empty after creation.
    pub roles: Vec<RoleName>,
    pub enabled: bool,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    /// Falls back to [`DEFAULT_PICTURE`] when absent.
    pub picture: Option<String>,
    /// Raw password; the directory hashes it before storage.
    pub password: String,
    pub provider: Provider,
    pub provider_user_id: Option<String>,
    pub roles: Vec<RoleName>,
}

/// Partial update of a user. `None` fields are left unchanged; the
/// directory bumps `modified_at` on every update.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub picture: Option<String>,
    pub roles: Option<Vec<RoleName>>,
    pub enabled: Option<bool>,
    pub status: Option<UserStatus>,
}
