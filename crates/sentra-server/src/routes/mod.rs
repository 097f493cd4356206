//! HTTP route registration.

use axum::Router;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use tower_cookies::CookieManagerLayer;

use crate::auth_layer;
use crate::state::AppState;

mod auth;
mod oauth;
mod profile;
mod users;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/signin", post(auth::signin))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/signout/{id}", get(auth::signout))
        .route("/oauth2/authorize/{provider}", get(oauth::authorize))
        .route("/oauth2/callback/{provider}", get(oauth::callback))
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/{id}",
            get(users::get_by_id).put(users::update).delete(users::remove),
        )
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_layer::authenticate,
        ))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
