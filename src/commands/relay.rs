//! Relay command - standalone WebSocket broadcast process.

use crate::cli::args::RelayArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::realtime::{relay_router, Relay};

use super::serve::shutdown_signal;

pub async fn execute(args: RelayArgs, config: Config) -> AppResult<()> {
    let host = args.host.unwrap_or(config.relay_host);
    let port = args.port.unwrap_or(config.relay_port);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind relay to {}: {}", addr, e)))?;

    tracing::info!("Relay listening on ws://{}/ws", addr);

    axum::serve(listener, relay_router(Relay::default()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Relay error: {}", e)))?;

    tracing::info!("Relay stopped");
    Ok(())
}
