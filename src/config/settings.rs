//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_APP_BASE_URL, DEFAULT_DATABASE_URL, DEFAULT_RELAY_PORT, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEFAULT_SESSION_TTL_HOURS, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Redis is optional; without it rate limiting is disabled
    pub redis_url: Option<String>,
    jwt_secret: String,
    pub session_ttl_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub relay_host: String,
    pub relay_port: u16,
    /// Mark the session cookie `Secure` (HTTPS deployments)
    pub cookie_secure: bool,
    /// Push notification emails to the apalis queue instead of only logging them
    pub email_queue_enabled: bool,
    pub app_base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &"[REDACTED]")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("relay_host", &self.relay_host)
            .field("relay_port", &self.relay_port)
            .field("cookie_secure", &self.cookie_secure)
            .field("email_queue_enabled", &self.email_queue_enabled)
            .field("app_base_url", &self.app_base_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set in release builds or is too short.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            jwt_secret,
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            relay_host: env::var("RELAY_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            relay_port: env::var("RELAY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RELAY_PORT),
            cookie_secure: env_flag("COOKIE_SECURE", !cfg!(debug_assertions)),
            email_queue_enabled: env_flag("EMAIL_QUEUE_ENABLED", false),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_APP_BASE_URL.to_string()),
        }
    }

    /// Build a configuration with defaults and an explicit secret.
    /// Used by tests and embedders that do not read the environment.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: None,
            jwt_secret: jwt_secret.into(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            relay_host: DEFAULT_SERVER_HOST.to_string(),
            relay_port: DEFAULT_RELAY_PORT,
            cookie_secure: false,
            email_queue_enabled: false,
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Get the relay listen address.
    pub fn relay_addr(&self) -> String {
        format!("{}:{}", self.relay_host, self.relay_port)
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}
