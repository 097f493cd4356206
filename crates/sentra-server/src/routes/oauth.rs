//! The OAuth2 redirect dance: authorization redirect and callback.
//!
//! The pending authorization request travels in a short-lived
//! HTTP-only cookie as a Base64-encoded JSON blob, correlating the
//! provider callback with the request that started the dance. The
//! cookie is deleted as soon as it is consumed.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sentra_core::error::SentraError;
use sentra_core::models::Provider;
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

const STATE_COOKIE: &str = "oauth2_auth_request";
const STATE_COOKIE_PATH: &str = "/oauth2";
const STATE_COOKIE_TTL_SECS: i64 = 180;

/// The pending authorization request, as serialized into the state
/// cookie.
#[derive(Debug, Serialize, Deserialize)]
struct PendingAuthorization {
    state: String,
    redirect_uri: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeParams {
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// `GET /oauth2/authorize/{provider}` — stash the pending request in
/// the state cookie and bounce the user agent to the provider.
pub async fn authorize(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<AuthorizeParams>,
    cookies: Cookies,
) -> Result<Redirect, ApiError> {
    let provider = federated_provider(&provider)?;
    let credentials = state
        .config
        .oauth_credentials(provider)
        .ok_or_else(|| SentraError::Validation {
            message: format!("{provider} login is not configured"),
        })?;

    let pending = PendingAuthorization {
        state: uuid::Uuid::new_v4().to_string(),
        redirect_uri: params
            .redirect_uri
            .unwrap_or_else(|| state.config.default_redirect.clone()),
    };

    let blob = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&pending).map_err(|e| SentraError::Crypto(e.to_string()))?,
    );
    cookies.add(
        Cookie::build((STATE_COOKIE, blob))
            .path(STATE_COOKIE_PATH)
            .http_only(true)
            .max_age(Duration::seconds(STATE_COOKIE_TTL_SECS))
            .build(),
    );

    let url = state.oauth.authorize_url(
        provider,
        credentials,
        &state.config.callback_uri(provider),
        &pending.state,
    )?;

    Ok(Redirect::to(&url))
}

/// `GET /oauth2/callback/{provider}` — consume the state cookie,
/// exchange the code, reconcile the identity, and hand back a token
/// on the stored redirect target. Failures redirect to the same
/// target carrying the error.
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    cookies: Cookies,
) -> Result<Redirect, ApiError> {
    let provider = federated_provider(&provider)?;

    let pending = take_pending_authorization(&cookies)?;
    let target = pending.redirect_uri;

    if let Some(error) = params.error {
        let detail = params.error_description.unwrap_or(error);
        warn!(%provider, error = %detail, "provider returned an error");
        return Ok(failure_redirect(&target, &detail));
    }

    if params.state.as_deref() != Some(pending.state.as_str()) {
        warn!(%provider, "authorization state mismatch");
        return Ok(failure_redirect(&target, "authorization state mismatch"));
    }

    let Some(code) = params.code else {
        return Ok(failure_redirect(&target, "missing authorization code"));
    };

    let Some(credentials) = state.config.oauth_credentials(provider) else {
        return Ok(failure_redirect(
            &target,
            &format!("{provider} login is not configured"),
        ));
    };

    let attributes = match state
        .oauth
        .fetch_identity(
            provider,
            credentials,
            &state.config.callback_uri(provider),
            &code,
        )
        .await
    {
        Ok(attributes) => attributes,
        Err(e) => {
            warn!(%provider, error = %e, "code exchange failed");
            return Ok(failure_redirect(&target, &e.to_string()));
        }
    };

    let identity = sentra_auth::identity::extract(provider, &attributes);
    match state.reconciler.reconcile(provider, &identity).await {
        Ok(principal) => {
            let token = state
                .codec
                .issue(&principal)
                .map_err(|e| SentraError::Crypto(e.to_string()))?;
            info!(user_id = principal.id, %provider, "federated sign-in");
            Ok(Redirect::to(&format!(
                "{}?token={}",
                target,
                urlencoding::encode(&token)
            )))
        }
        Err(e) => {
            warn!(%provider, error = %e, "reconciliation rejected the login");
            Ok(failure_redirect(&target, &e.to_string()))
        }
    }
}

/// Redirect back to the stored target, carrying the failure cause in
/// an `error` query parameter (mirrors the success path's `token`).
fn failure_redirect(target: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{}?error={}", target, urlencoding::encode(message)))
}

fn federated_provider(raw: &str) -> Result<Provider, SentraError> {
    match Provider::from_str(raw) {
        Ok(Provider::Local) | Err(_) => Err(SentraError::Validation {
            message: format!("unknown federated provider: {raw}"),
        }),
        Ok(provider) => Ok(provider),
    }
}

/// Read, decode, and delete the state cookie. A missing or garbled
/// cookie means the dance cannot be correlated — the caller gets a
/// 400 since there is no stored redirect target to fail toward.
fn take_pending_authorization(cookies: &Cookies) -> Result<PendingAuthorization, SentraError> {
    let cookie = cookies.get(STATE_COOKIE).ok_or_else(|| SentraError::Validation {
        message: "authorization request cookie missing or expired".into(),
    })?;
    let value = cookie.value().to_owned();

    let mut removal = Cookie::new(STATE_COOKIE, "");
    removal.set_path(STATE_COOKIE_PATH);
    cookies.remove(removal);

    let bytes = URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|_| SentraError::Validation {
            message: "authorization request cookie is not valid".into(),
        })?;
    serde_json::from_slice(&bytes).map_err(|_| SentraError::Validation {
        message: "authorization request cookie is not valid".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_authorization_roundtrips_through_base64_json() {
        let pending = PendingAuthorization {
            state: "nonce-1".into(),
            redirect_uri: "http://localhost:3000/app".into(),
        };

        let blob = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&pending).unwrap());
        let bytes = URL_SAFE_NO_PAD.decode(blob).unwrap();
        let decoded: PendingAuthorization = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(decoded.state, "nonce-1");
        assert_eq!(decoded.redirect_uri, "http://localhost:3000/app");
    }

    #[test]
    fn local_is_not_a_federated_provider() {
        assert!(federated_provider("google").is_ok());
        assert!(federated_provider("facebook").is_ok());
        assert!(federated_provider("local").is_err());
        assert!(federated_provider("github").is_err());
    }
}
