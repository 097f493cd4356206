//! Local sign-in, sign-up, and sign-out.

use axum::Json;
use axum::extract::{Path, State};
use sentra_auth::policy::{self, AccessRequirement};
use sentra_core::error::SentraError;
use sentra_core::models::{NewUser, Provider, RoleName, UserStatus, UserUpdate};
use sentra_core::directory::UserDirectory;
use tracing::info;

use crate::auth_layer::CurrentUser;
use crate::dto::{AuthenticationResponse, LoginRequest, SignUpRequest, UserInfo};
use crate::error::{ApiError, ApiResponse};
use crate::state::AppState;

/// `POST /api/auth/signin` — exchange local credentials for a token
/// plus the caller's user info.
pub async fn signin(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthenticationResponse>, ApiError> {
    body.validate()?;

    let principal = state
        .authenticator
        .authenticate(&body.email, &body.password)
        .await?;
    let token = state
        .codec
        .issue(&principal)
        .map_err(|e| SentraError::Crypto(e.to_string()))?;

    Ok(Json(AuthenticationResponse {
        token,
        user: UserInfo::from(&principal),
    }))
}

/// `POST /api/auth/signup` — register a local account.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignUpRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    body.validate()?;

    let user = state
        .users
        .create(NewUser {
            email: body.email,
            display_name: body.display_name,
            picture: body.picture,
            password: body.password,
            provider: Provider::Local,
            provider_user_id: None,
            roles: vec![RoleName::User],
        })
        .await?;

    info!(user_id = user.id, "registered local user");
    Ok(Json(ApiResponse::ok("User registered successfully")))
}

/// `GET /api/auth/signout/{id}` — mark the account disconnected. The
/// token itself stays valid until its encoded expiry; there is no
/// revocation list.
pub async fn signout(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse>, ApiError> {
    policy::authorize(AccessRequirement::AnyRole(&[RoleName::User]), Some(&principal))?;
    policy::authorize_owner(&principal, id)?;

    state
        .users
        .update(
            id,
            UserUpdate {
                status: Some(UserStatus::Disconnected),
                ..Default::default()
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok("Signed out")))
}
