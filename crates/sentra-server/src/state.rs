//! Shared application state.

use std::sync::Arc;

use sentra_auth::credentials::CredentialAuthenticator;
use sentra_auth::reconcile::FederatedIdentityReconciler;
use sentra_auth::token::{TokenCodec, TokenError};
use sentra_directory::{SurrealRoleDirectory, SurrealUserDirectory};
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;

use crate::config::ServerConfig;
use crate::oauth_client::OAuthClient;

pub type UserStore = SurrealUserDirectory<Client>;
pub type RoleStore = SurrealRoleDirectory<Client>;

/// Everything a handler needs, cloned cheaply per request. All fields
/// are stateless with respect to request-scoped inputs; the only
/// shared mutable resource is the database behind the directories.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub roles: RoleStore,
    pub codec: TokenCodec,
    pub authenticator: CredentialAuthenticator<UserStore>,
    pub reconciler: FederatedIdentityReconciler<UserStore>,
    pub oauth: OAuthClient,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Surreal<Client>, config: ServerConfig) -> Result<Self, TokenError> {
        let users = SurrealUserDirectory::new(db.clone());
        let roles = SurrealRoleDirectory::new(db);
        let codec = TokenCodec::from_config(&config.auth)?;

        Ok(Self {
            authenticator: CredentialAuthenticator::new(users.clone()),
            reconciler: FederatedIdentityReconciler::new(users.clone()),
            users,
            roles,
            codec,
            oauth: OAuthClient::new(),
            config: Arc::new(config),
        })
    }
}
