//! Admin user management.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use sentra_auth::password;
use sentra_auth::policy::{self, AccessRequirement};
use sentra_core::directory::UserDirectory;
use sentra_core::error::{SentraError, SentraResult};
use sentra_core::models::{NewUser, Principal, Provider, RoleName};
use tracing::info;

use crate::auth_layer::CurrentUser;
use crate::dto::{CreateUserRequest, UserInfo, UserUpdateRequest};
use crate::error::ApiError;
use crate::state::AppState;

const TEMPORARY_PASSWORD_LEN: usize = 12;

fn require_admin(principal: &Principal) -> SentraResult<()> {
    policy::authorize(AccessRequirement::AnyRole(&[RoleName::Admin]), Some(principal))
}

/// `GET /api/users`
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<Vec<UserInfo>>, ApiError> {
    require_admin(&principal)?;

    let users = state.users.list().await?;
    Ok(Json(users.iter().map(UserInfo::from).collect()))
}

/// `GET /api/users/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<UserInfo>, ApiError> {
    require_admin(&principal)?;

    let user = state.users.find_by_id(id).await?;
    Ok(Json(UserInfo::from(&user)))
}

/// `POST /api/users` — create a local account with a generated
/// temporary password.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserInfo>), ApiError> {
    require_admin(&principal)?;
    body.validate()?;

    let roles = match body.roles {
        Some(names) => {
            let parsed = names
                .iter()
                .map(|name| name.parse::<RoleName>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| SentraError::Validation {
                    message: format!("roles: {e}"),
                })?;
            if parsed.is_empty() {
                vec![RoleName::User]
            } else {
                parsed
            }
        }
        None => vec![RoleName::User],
    };

    let user = state
        .users
        .create(NewUser {
            email: body.email,
            display_name: body.display_name,
            picture: body.picture,
            password: password::generate_password(TEMPORARY_PASSWORD_LEN),
            provider: Provider::Local,
            provider_user_id: None,
            roles,
        })
        .await?;

    info!(user_id = user.id, actor = principal.id, "admin created user");
    Ok((StatusCode::CREATED, Json(UserInfo::from(&user))))
}

/// `PUT /api/users/{id}`
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<UserUpdateRequest>,
) -> Result<Json<UserInfo>, ApiError> {
    require_admin(&principal)?;

    let update = body.into_update()?;
    let user = state.users.update(id, update).await?;
    Ok(Json(UserInfo::from(&user)))
}

/// `DELETE /api/users/{id}` — soft delete: the record is disabled and
/// suspended, never removed.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_admin(&principal)?;

    state.users.deactivate(id).await?;
    info!(user_id = id, actor = principal.id, "deactivated user");
    Ok(StatusCode::NO_CONTENT)
}
