//! Redis client used for fixed-window rate limiting.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use crate::config::CACHE_PREFIX_RATE_LIMIT;
use crate::errors::{AppError, AppResult};

/// Redis wrapper around a multiplexed connection manager.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub count: u64,
    pub allowed: bool,
}

impl RateLimitStatus {
    pub fn new(count: u64, max_requests: u64) -> Self {
        Self {
            count,
            allowed: count <= max_requests,
        }
    }

    pub fn remaining(&self, max_requests: u64) -> u64 {
        max_requests.saturating_sub(self.count)
    }
}

impl Cache {
    /// Connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");
        Ok(Self { connection })
    }

    /// Increment the counter for `identifier` in the current window.
    ///
    /// The first hit of a window sets the expiry, so the window is anchored
    /// at the first request rather than at wall-clock boundaries.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<RateLimitStatus> {
        let key = rate_limit_key(identifier);
        let mut conn = self.connection.clone();

        let count: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        if count == 1 {
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        Ok(RateLimitStatus::new(count.max(0) as u64, max_requests))
    }

    /// Round-trip a PING, used by the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }
}

fn rate_limit_key(identifier: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier)
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
