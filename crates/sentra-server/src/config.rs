//! Server configuration, loaded from environment variables.

use std::env;

use sentra_auth::AuthConfig;
use sentra_core::models::Provider;
use sentra_directory::DbConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// OAuth2 client credentials for one federated provider.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (default: `0.0.0.0:8080`).
    pub bind_addr: String,
    /// Signing secret and token lifetime.
    pub auth: AuthConfig,
    pub db: DbConfig,
    /// Externally reachable base URL, used to build OAuth2 callback
    /// URIs (default: `http://localhost:8080`).
    pub public_url: String,
    /// Where a federated login lands when the client supplied no
    /// `redirect_uri` of its own.
    pub default_redirect: String,
    pub google: Option<OAuthCredentials>,
    pub facebook: Option<OAuthCredentials>,
}

impl ServerConfig {
    /// Read the full configuration from the environment. The signing
    /// secret is the only hard requirement; everything else has a
    /// development default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_secret =
            env::var("SENTRA_TOKEN_SECRET").map_err(|_| ConfigError::Missing("SENTRA_TOKEN_SECRET"))?;

        let token_ttl_ms = match env::var("SENTRA_TOKEN_TTL_MS") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                name: "SENTRA_TOKEN_TTL_MS",
                reason: format!("{e}"),
            })?,
            Err(_) => AuthConfig::default().token_ttl_ms,
        };

        let db_defaults = DbConfig::default();
        let db = DbConfig {
            url: env_or("SENTRA_DB_URL", &db_defaults.url),
            namespace: env_or("SENTRA_DB_NAMESPACE", &db_defaults.namespace),
            database: env_or("SENTRA_DB_DATABASE", &db_defaults.database),
            username: env_or("SENTRA_DB_USERNAME", &db_defaults.username),
            password: env_or("SENTRA_DB_PASSWORD", &db_defaults.password),
        };

        let public_url = env_or("SENTRA_PUBLIC_URL", "http://localhost:8080");

        Ok(Self {
            bind_addr: env_or("SENTRA_BIND_ADDR", "0.0.0.0:8080"),
            auth: AuthConfig {
                token_secret,
                token_ttl_ms,
            },
            db,
            default_redirect: env_or("SENTRA_DEFAULT_REDIRECT", "http://localhost:8080/api/profile"),
            public_url,
            google: credentials_from_env("SENTRA_GOOGLE_CLIENT_ID", "SENTRA_GOOGLE_CLIENT_SECRET"),
            facebook: credentials_from_env(
                "SENTRA_FACEBOOK_CLIENT_ID",
                "SENTRA_FACEBOOK_CLIENT_SECRET",
            ),
        })
    }

    /// Credentials for a federated provider, if configured.
    pub fn oauth_credentials(&self, provider: Provider) -> Option<&OAuthCredentials> {
        match provider {
            Provider::Google => self.google.as_ref(),
            Provider::Facebook => self.facebook.as_ref(),
            Provider::Local => None,
        }
    }

    /// The callback URI registered with the provider.
    pub fn callback_uri(&self, provider: Provider) -> String {
        format!("{}/oauth2/callback/{}", self.public_url, provider)
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn credentials_from_env(id_var: &str, secret_var: &str) -> Option<OAuthCredentials> {
    match (env::var(id_var), env::var(secret_var)) {
        (Ok(client_id), Ok(client_secret)) => Some(OAuthCredentials {
            client_id,
            client_secret,
        }),
        _ => None,
    }
}
