pub mod analysis_service; // External analysis service client
pub mod analytics; // Pure aggregators
pub mod api; // HTTP surface
pub mod backend; // Managed record store
pub mod charts; // Chart configuration adapters
pub mod config;
pub mod dashboard; // Panel state machine + region refresh
pub mod error;
pub mod fetch; // Region-scoped record fetchers
pub mod models;
pub mod session; // Signed-in user + selected region

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::analysis_service::HttpAnalysisService;
use crate::api::ApiContext;
use crate::backend::RestStore;
use crate::config::{AppConfig, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Signal handling failed: {0}")]
    Signal(#[from] std::io::Error),
}

/// Start the service and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    tracing::info!(
        backend = %config.backend.base_url,
        analysis = %config.analysis.base_url,
        timeout_secs = config.backend.timeout_secs,
        "Configuration loaded"
    );

    let ctx = ApiContext::new(
        Arc::new(RestStore::from_config(&config.backend)),
        Arc::new(HttpAnalysisService::from_config(&config.analysis)),
    );

    let mut server = api::start_api_server(ctx, config.bind_addr)
        .await
        .map_err(StartupError::Server)?;
    tracing::info!(addr = %server.info.server_addr, "Listening");

    let signal = tokio::signal::ctrl_c().await;
    server.shutdown();
    signal?;

    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
