//! Start-up helpers shared by the service binaries

use anyhow::Result;
use staykey_common::database::{self, DatabaseConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    bootstrap,
    config::AdminBootstrap,
    repositories::{PgStore, Store},
    state::AppState,
};

/// Install the global `tracing` subscriber, honouring `RUST_LOG` (default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

/// Connect to Postgres, verify connectivity, and apply the schema
pub async fn connect_postgres() -> Result<PgStore> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::ensure_schema(&pool).await?;
    Ok(PgStore::new(pool))
}

/// Provision the administrator account when one is configured
pub async fn bootstrap_admin<S: Store>(state: &AppState<S>) -> Result<()> {
    match AdminBootstrap::from_env() {
        Some(admin) => bootstrap::ensure_admin(&state.store, &state.credentials, &admin).await,
        None => {
            info!("ADMIN_EMAIL/ADMIN_PASSWORD not set; skipping administrator bootstrap");
            Ok(())
        }
    }
}
