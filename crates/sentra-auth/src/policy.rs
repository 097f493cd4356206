//! Role-based access decisions.
//!
//! Consulted last, after the interceptor has attached (or withheld) a
//! principal. This is where fail-closed lives: the interceptor lets
//! anonymous requests through, the policy turns them away.

use sentra_core::error::{SentraError, SentraResult};
use sentra_core::models::{Principal, RoleName};

/// What an endpoint declares about who may call it.
#[derive(Debug, Clone, Copy)]
pub enum AccessRequirement<'a> {
    /// Always passes, principal or not.
    Public,
    /// Any authenticated principal.
    Authenticated,
    /// A principal holding at least one of the listed roles.
    AnyRole(&'a [RoleName]),
}

/// Evaluate a requirement against the request's principal, if any.
pub fn authorize(
    requirement: AccessRequirement<'_>,
    principal: Option<&Principal>,
) -> SentraResult<()> {
    match requirement {
        AccessRequirement::Public => Ok(()),
        AccessRequirement::Authenticated => match principal {
            Some(_) => Ok(()),
            None => Err(denied("authentication required")),
        },
        AccessRequirement::AnyRole(roles) => {
            let principal = principal.ok_or_else(|| denied("authentication required"))?;
            if roles.iter().any(|role| principal.has_role(*role)) {
                Ok(())
            } else {
                Err(denied(&format!(
                    "requires one of roles [{}]",
                    roles
                        .iter()
                        .map(|r| r.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )))
            }
        }
    }
}

/// Ownership check for self-service endpoints: the resource owner and
/// the principal must be the same user, unless the principal is an
/// admin.
pub fn authorize_owner(principal: &Principal, owner_id: i64) -> SentraResult<()> {
    if principal.id == owner_id || principal.has_role(RoleName::Admin) {
        Ok(())
    } else {
        Err(denied("not the resource owner"))
    }
}

fn denied(reason: &str) -> SentraError {
    SentraError::AccessDenied {
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentra_core::models::{Provider, UserStatus};

    fn principal_with(roles: Vec<RoleName>) -> Principal {
        Principal {
            id: 7,
            email: "user@example.com".into(),
            display_name: "User".into(),
            picture: String::new(),
            provider: Provider::Local,
            roles,
            enabled: true,
            status: UserStatus::Active,
        }
    }

    #[test]
    fn public_passes_without_principal() {
        assert!(authorize(AccessRequirement::Public, None).is_ok());
    }

    #[test]
    fn role_gate_rejects_missing_principal() {
        let result = authorize(AccessRequirement::AnyRole(&[RoleName::User]), None);
        assert!(matches!(result, Err(SentraError::AccessDenied { .. })));
    }

    #[test]
    fn role_gate_rejects_insufficient_role() {
        let principal = principal_with(vec![RoleName::User]);
        let result = authorize(
            AccessRequirement::AnyRole(&[RoleName::Admin]),
            Some(&principal),
        );
        assert!(matches!(result, Err(SentraError::AccessDenied { .. })));
    }

    #[test]
    fn role_gate_accepts_any_listed_role() {
        let principal = principal_with(vec![RoleName::Moderator]);
        let result = authorize(
            AccessRequirement::AnyRole(&[RoleName::Admin, RoleName::Moderator]),
            Some(&principal),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn authenticated_requires_presence_only() {
        let principal = principal_with(vec![RoleName::User]);
        assert!(authorize(AccessRequirement::Authenticated, Some(&principal)).is_ok());
        assert!(authorize(AccessRequirement::Authenticated, None).is_err());
    }

    #[test]
    fn owner_check_allows_owner_and_admin() {
        let owner = principal_with(vec![RoleName::User]);
        assert!(authorize_owner(&owner, 7).is_ok());
        assert!(authorize_owner(&owner, 8).is_err());

        let admin = principal_with(vec![RoleName::Admin]);
        assert!(authorize_owner(&admin, 8).is_ok());
    }
}
