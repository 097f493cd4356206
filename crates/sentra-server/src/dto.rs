//! Request/response payloads and input validation.

use std::str::FromStr;

use sentra_core::error::SentraError;
use sentra_core::models::{Principal, RoleName, User, UserUpdate};
use serde::{Deserialize, Serialize};

/// The user-info payload returned by sign-in, profile, and user
/// management endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub picture: String,
    pub email: String,
    pub status: String,
    pub roles: Vec<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            display_name: user.display_name.clone(),
            picture: user.picture.clone(),
            email: user.email.clone(),
            status: user.status.as_str().to_owned(),
            roles: user.roles.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl From<&Principal> for UserInfo {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.to_string(),
            display_name: principal.display_name.clone(),
            picture: principal.picture.clone(),
            email: principal.email.clone(),
            status: principal.status.as_str().to_owned(),
            roles: principal.roles.iter().map(|r| r.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), SentraError> {
        let mut problems = FieldErrors::default();
        if self.email.is_empty() {
            problems.push("email", "must not be blank");
        }
        if self.password.is_empty() {
            problems.push("password", "must not be blank");
        }
        problems.into_result()
    }
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "matchingPassword")]
    pub matching_password: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub picture: Option<String>,
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<(), SentraError> {
        let mut problems = FieldErrors::default();
        if self.email.is_empty() || !self.email.contains('@') {
            problems.push("email", "must be a valid email address");
        }
        if self.password.len() < 6 {
            problems.push("password", "must be at least 6 characters");
        }
        if self.password != self.matching_password {
            problems.push("matchingPassword", "passwords do not match");
        }
        if self.display_name.is_empty() {
            problems.push("displayName", "must not be blank");
        }
        problems.into_result()
    }
}

#[derive(Debug, Serialize)]
pub struct AuthenticationResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Partial user update accepted by the management and profile
/// endpoints. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UserUpdateRequest {
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub picture: Option<String>,
    pub roles: Option<Vec<String>>,
}

impl UserUpdateRequest {
    pub fn into_update(self) -> Result<UserUpdate, SentraError> {
        let roles = match self.roles {
            Some(names) => {
                let parsed = names
                    .iter()
                    .map(|name| RoleName::from_str(name))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| SentraError::Validation {
                        message: format!("roles: {e}"),
                    })?;
                Some(parsed)
            }
            None => None,
        };

        Ok(UserUpdate {
            email: self.email,
            display_name: self.display_name,
            picture: self.picture,
            roles,
            ..Default::default()
        })
    }
}

/// Admin-side user creation. The account gets a generated temporary
/// password and provider `local`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub picture: Option<String>,
    pub roles: Option<Vec<String>>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), SentraError> {
        let mut problems = FieldErrors::default();
        if self.email.is_empty() || !self.email.contains('@') {
            problems.push("email", "must be a valid email address");
        }
        if self.display_name.is_empty() {
            problems.push("displayName", "must not be blank");
        }
        problems.into_result()
    }
}

/// Collects per-field validation failures and folds them into a
/// single comma-joined `field : message` string.
#[derive(Debug, Default)]
struct FieldErrors {
    entries: Vec<String>,
}

impl FieldErrors {
    fn push(&mut self, field: &str, message: &str) {
        self.entries.push(format!("{field} : {message}"));
    }

    fn into_result(self) -> Result<(), SentraError> {
        if self.entries.is_empty() {
            Ok(())
        } else {
            Err(SentraError::Validation {
                message: self.entries.join(", "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_validation_aggregates_failures() {
        let request = SignUpRequest {
            email: "not-an-email".into(),
            password: "pw".into(),
            matching_password: "other".into(),
            display_name: String::new(),
            picture: None,
        };

        let err = request.validate().unwrap_err();
        let SentraError::Validation { message } = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("email : "));
        assert!(message.contains("password : "));
        assert!(message.contains("matchingPassword : "));
        assert!(message.contains("displayName : "));
        // One comma-joined string, not separate errors.
        assert_eq!(message.matches(", ").count(), 3);
    }

    #[test]
    fn valid_signup_passes() {
        let request = SignUpRequest {
            email: "alice@example.com".into(),
            password: "secret1".into(),
            matching_password: "secret1".into(),
            display_name: "Alice".into(),
            picture: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn unknown_role_name_is_rejected() {
        let request = UserUpdateRequest {
            email: None,
            display_name: None,
            picture: None,
            roles: Some(vec!["SUPERUSER".into()]),
        };
        assert!(request.into_update().is_err());
    }
}
