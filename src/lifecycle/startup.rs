//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics
//! - Build router, transport, gateway and HTTP server in dependency order
//! - Serve until a stop signal arrives

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, GatewayConfig};
use crate::gateway::Gateway;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::{signals, Shutdown};
use crate::net::TcpTransport;
use crate::observability::logging::{init_logging, LoggingError};
use crate::observability::metrics;
use crate::routing::DestinationRouter;
use crate::security::ApiKeyRepository;

/// Failure before the server starts serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Handler state for a validated config.
pub fn build_state(config: &GatewayConfig) -> AppState {
    let router = DestinationRouter::new(config.routes.clone(), config.destinations.clone());
    let transport = TcpTransport::new(&config.transport);

    AppState {
        gateway: Gateway::new(Arc::new(router), Arc::new(transport)),
        api_keys: Arc::new(ApiKeyRepository::new(config.api_keys.clone())),
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
    }
}

/// Start the gateway from the config file at `path` and serve until stopped.
pub async fn run(path: &Path) -> Result<(), StartupError> {
    let config = load_config(path)?;
    init_logging(&config.observability)?;

    tracing::info!(
        config = %path.display(),
        bind_address = %config.server.bind_address,
        routes = config.routes.len(),
        destinations = config.destinations.len(),
        api_keys = config.api_keys.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let state = build_state(&config);

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(|source| StartupError::Bind { address: config.server.bind_address.clone(), source })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    HttpServer::new(state).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
