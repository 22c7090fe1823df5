//! Producer side of the e-mail queue consumed by `jobs work`.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;

use crate::config::JOB_NAME_EMAIL;
use crate::errors::{AppError, AppResult};
use crate::jobs::EmailJob;

/// Storage namespace shared by producer and worker.
pub fn email_storage_config() -> apalis_sql::Config {
    apalis_sql::Config::new(JOB_NAME_EMAIL)
}

#[derive(Clone)]
pub struct EmailQueue {
    storage: PostgresStorage<EmailJob>,
}

impl EmailQueue {
    /// Open a small dedicated pool and make sure the apalis tables exist.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url)
            .await
            .map_err(|e| AppError::internal(format!("Failed to connect job queue: {}", e)))?;

        PostgresStorage::setup(&pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

        tracing::info!(namespace = JOB_NAME_EMAIL, "Email queue connected");
        Ok(Self {
            storage: PostgresStorage::new_with_config(pool, email_storage_config()),
        })
    }

    pub async fn push(&self, job: EmailJob) -> AppResult<()> {
        let mut storage = self.storage.clone();
        storage
            .push(job)
            .await
            .map(|_| ())
            .map_err(|e| AppError::internal(format!("Failed to enqueue email: {}", e)))
    }
}
