//! Request-authentication middleware and principal extractors.
//!
//! The middleware runs exactly once per request, before routing
//! reaches any handler, and stores the resolved principal (or its
//! absence) in the request extensions. Handlers receive it through
//! explicit extractors — there is no ambient per-thread auth state.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use sentra_auth::interceptor::resolve_principal;
use sentra_core::models::Principal;

use crate::error::ApiError;
use crate::state::AppState;

/// The per-request authentication context: a principal, or nothing.
#[derive(Clone)]
pub struct AuthContext(pub Option<Principal>);

/// Middleware: extract the bearer token, resolve it, attach the
/// context, and always continue — rejection is the access policy's
/// job inside the handlers.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let principal =
        resolve_principal(authorization.as_deref(), &state.codec, &state.users).await;
    request.extensions_mut().insert(AuthContext(principal));

    next.run(request).await
}

/// Extractor for endpoints that require an authenticated caller.
/// Rejects with 401 when the request carries no resolved principal.
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .and_then(|ctx| ctx.0.clone())
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}

/// Extractor for endpoints that serve both anonymous and
/// authenticated callers.
pub struct MaybeUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            parts
                .extensions
                .get::<AuthContext>()
                .and_then(|ctx| ctx.0.clone()),
        ))
    }
}
