pub mod api;
pub mod billing;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, ServerConfig};
use crate::core_state::{CoreError, CoreState};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Core(#[from] CoreError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the billing API and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let server_config = ServerConfig::from_env()?;
    let core = Arc::new(CoreState::from_config(&server_config));

    // Migrate up front so a broken database fails start-up, not the first request.
    drop(core.open_db()?);
    tracing::info!(
        db_path = %core.db_path().display(),
        duplicate_policy = %core.rules.duplicate_policy,
        overdraw_policy = %core.rules.overdraw_policy,
        "Database ready"
    );

    let mut server = api::start_server_on(core, server_config.bind_addr).await?;
    tracing::info!(addr = %server.addr, "Listening");

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    server.stopped().await;
    Ok(())
}
