//! Translation of core errors into structured API responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sentra_core::error::SentraError;
use serde::Serialize;
use tracing::error;

/// The uniform response envelope for non-payload outcomes.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Error type returned by handlers. Nothing here is fatal to the
/// process — every failure is per-request.
#[derive(Debug)]
pub enum ApiError {
    /// No principal attached where one was required.
    Unauthorized,
    Core(SentraError),
}

impl From<SentraError> for ApiError {
    fn from(err: SentraError) -> Self {
        ApiError::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "full authentication is required to access this resource".to_owned(),
            ),
            ApiError::Core(err) => {
                let status = match &err {
                    SentraError::InvalidCredentials | SentraError::Token { .. } => {
                        StatusCode::UNAUTHORIZED
                    }
                    SentraError::AccessDenied { .. } => StatusCode::FORBIDDEN,
                    SentraError::NotFound { .. } => StatusCode::NOT_FOUND,
                    SentraError::AlreadyExists { .. }
                    | SentraError::ProviderMismatch { .. }
                    | SentraError::IdentityIncomplete { .. }
                    | SentraError::Validation { .. } => StatusCode::BAD_REQUEST,
                    SentraError::ProviderExchange(_) => StatusCode::BAD_GATEWAY,
                    SentraError::Directory(_) | SentraError::Crypto(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                if status.is_server_error() {
                    error!(error = %err, "request failed");
                }
                (status, err.to_string())
            }
        };

        (status, Json(ApiResponse::failure(message))).into_response()
    }
}
