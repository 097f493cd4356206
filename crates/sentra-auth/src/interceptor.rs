//! Per-request bearer credential extraction and principal resolution.
//!
//! This layer is fail-open: a missing, malformed, expired, or
//! unresolvable token means the request proceeds unauthenticated.
//! Rejection is the access policy's job, which lets public endpoints
//! skip authentication entirely.

use sentra_core::directory::UserDirectory;
use sentra_core::models::Principal;
use tracing::{debug, warn};

use crate::token::TokenCodec;

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the token out of an `Authorization: Bearer <token>` header
/// value.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve an `Authorization` header value to a principal, or `None`.
///
/// On a valid token the subject is re-resolved against the directory —
/// not the claims snapshot — so role and status changes take effect
/// without re-login. A subject that no longer resolves (user deleted)
/// is treated identically to "no token".
pub async fn resolve_principal<U: UserDirectory>(
    authorization: Option<&str>,
    codec: &TokenCodec,
    users: &U,
) -> Option<Principal> {
    let token = bearer_token(authorization)?;

    if !codec.validate(token) {
        return None;
    }
    let claims = match codec.claims(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "validated token failed to parse");
            return None;
        }
    };

    let user_id: i64 = match claims.sub.parse() {
        Ok(id) => id,
        Err(_) => {
            warn!(sub = %claims.sub, "token subject is not a user id");
            return None;
        }
    };

    match users.find_by_id(user_id).await {
        Ok(user) => Some(Principal::from(&user)),
        Err(e) => {
            debug!(user_id, error = %e, "token subject no longer resolves");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert_eq!(bearer_token(None), None);
        assert_eq!(bearer_token(Some("")), None);
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(Some("bearer abc")), None);
    }
}
