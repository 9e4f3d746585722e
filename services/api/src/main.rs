use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};

use staykey_api::routes;
use staykey_auth::{
    AppState,
    config::{ServerConfig, StorageBackend},
    jwt::{JwtConfig, JwtService},
    repositories::{InMemoryStore, Store},
    startup,
};

#[tokio::main]
async fn main() -> Result<()> {
    startup::init_tracing();

    info!("Starting API service");

    let config = ServerConfig::from_env("0.0.0.0:3001")?;
    let jwt = JwtService::new(JwtConfig::from_env(config.environment)?);

    match config.storage {
        StorageBackend::Postgres => {
            let store = startup::connect_postgres().await?;
            serve(&config, AppState::new(store, jwt, config.environment)).await
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; all data is lost on restart");
            let store = InMemoryStore::new();
            serve(&config, AppState::new(store, jwt, config.environment)).await
        }
    }
}

async fn serve<S: Store>(config: &ServerConfig, state: AppState<S>) -> Result<()> {
    startup::bootstrap_admin(&state).await?;

    info!("API service initialized successfully");

    let app = routes::create_router(state);

    let listener = TcpListener::bind(config.bind_address).await?;
    info!("API service listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
