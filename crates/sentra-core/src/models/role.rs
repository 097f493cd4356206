//! Role domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed role vocabulary. Authorization decisions key off these
/// names; there are no free-form roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleName {
    User,
    Admin,
    Moderator,
}

impl RoleName {
    pub const ALL: [RoleName; 3] = [RoleName::User, RoleName::Admin, RoleName::Moderator];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::User => "USER",
            RoleName::Admin => "ADMIN",
            RoleName::Moderator => "MODERATOR",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(RoleName::User),
            "ADMIN" => Ok(RoleName::Admin),
            "MODERATOR" => Ok(RoleName::Moderator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: RoleName,
    pub created_at: DateTime<Utc>,
}
