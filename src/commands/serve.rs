//! Serve command - starts the HTTP API.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database, EmailQueue};

pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let db = Arc::new(db);

    let cache = match config.redis_url.as_deref() {
        Some(url) => {
            let cache = Cache::try_connect(url)
                .await
                .map_err(|e| AppError::internal(format!("Redis connection failed: {}", e)))?;
            tracing::info!("Redis connected, rate limiting enabled");
            Some(Arc::new(cache))
        }
        None => {
            tracing::warn!("REDIS_URL not set, rate limiting disabled");
            None
        }
    };

    let queue = if config.email_queue_enabled {
        Some(EmailQueue::connect(&config.database_url).await?)
    } else {
        tracing::info!("Email queue disabled, notifications are logged only");
        None
    };

    let host = args.host.unwrap_or_else(|| config.server_host.clone());
    let port = args.port.unwrap_or(config.server_port);

    let app = create_router(AppState::from_config(db, cache, queue, config));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Received shutdown signal");
}
