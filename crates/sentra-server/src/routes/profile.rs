//! Self-service profile endpoints for the current principal.

use axum::Json;
use axum::extract::State;
use sentra_core::directory::UserDirectory;

use crate::auth_layer::CurrentUser;
use crate::dto::{UserInfo, UserUpdateRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/profile`
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<UserInfo>, ApiError> {
    let user = state.users.find_by_id(principal.id).await?;
    Ok(Json(UserInfo::from(&user)))
}

/// `PUT /api/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(body): Json<UserUpdateRequest>,
) -> Result<Json<UserInfo>, ApiError> {
    let mut update = body.into_update()?;
    // Role changes are an admin concern, not self-service.
    update.roles = None;

    let user = state.users.update(principal.id, update).await?;
    Ok(Json(UserInfo::from(&user)))
}
