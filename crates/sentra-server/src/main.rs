//! Sentra Server — application entry point.

use tracing_subscriber::EnvFilter;

mod auth_layer;
mod config;
mod dto;
mod error;
mod oauth_client;
mod routes;
mod seed;
mod state;

use config::ServerConfig;
use sentra_directory::{DbManager, run_migrations};
use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sentra=info".parse().unwrap()))
        .json()
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let manager = DbManager::connect(&config.db).await?;
    let db = manager.client();
    run_migrations(&db).await?;

    let state = AppState::new(db, config)?;
    seed::run(&state.users, &state.roles).await?;

    let bind_addr = state.config.bind_addr.clone();
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Sentra listening");
    axum::serve(listener, app).await?;

    Ok(())
}
