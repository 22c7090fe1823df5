//! Jobs command - e-mail queue worker and maintenance.
//!
//! ```bash
//! content-approval jobs work    # consume the e-mail queue
//! content-approval jobs list    # counts per status
//! content-approval jobs clear   # drop failed e-mail jobs
//! ```

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, JOB_NAME_EMAIL};
use crate::errors::{AppError, AppResult};

pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Consume e-mail jobs until Ctrl+C.
async fn run_worker(config: &Config) -> AppResult<()> {
    use apalis::prelude::*;
    use apalis_sql::postgres::PostgresStorage;
    use apalis_sql::sqlx::postgres::PgPoolOptions;

    use crate::infra::queue::email_storage_config;
    use crate::jobs::{email_job_handler, EmailJob};

    tracing::info!("Connecting to database for job worker...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    let email_storage: PostgresStorage<EmailJob> =
        PostgresStorage::new_with_config(pool, email_storage_config());

    tracing::info!(namespace = JOB_NAME_EMAIL, "Job worker started. Press Ctrl+C to stop.");

    let worker = WorkerBuilder::new("email-worker")
        .backend(email_storage)
        .build_fn(email_job_handler);

    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::internal(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Job worker stopped.");
    Ok(())
}

async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    Database::connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))
}

/// The apalis schema only exists once a worker or producer has run `setup`.
async fn queue_initialized(db: &DatabaseConnection) -> AppResult<bool> {
    let row = db
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') AS exists",
        ))
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct QueueCounts {
    pending: i64,
    running: i64,
    failed: i64,
    done: i64,
    killed: i64,
}

impl QueueCounts {
    fn record(&mut self, status: &str, count: i64) {
        match status {
            "Pending" => self.pending = count,
            "Running" => self.running = count,
            "Failed" => self.failed = count,
            "Done" => self.done = count,
            "Killed" => self.killed = count,
            other => tracing::debug!(status = other, count, "ignoring unknown job status"),
        }
    }
}

async fn list_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;

    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Run 'jobs work' first to create the queue tables.");
        return Ok(());
    }

    let rows = db
        .query_all(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT status::text AS status, COUNT(*)::bigint AS count FROM apalis.jobs WHERE job_type = $1 GROUP BY status",
            [JOB_NAME_EMAIL.into()],
        ))
        .await?;

    let mut counts = QueueCounts::default();
    for row in rows {
        let status = row.try_get::<String>("", "status")?;
        let count = row.try_get::<i64>("", "count")?;
        counts.record(&status, count);
    }

    println!("\n=== {} ===", JOB_NAME_EMAIL);
    println!("Pending:  {}", counts.pending);
    println!("Running:  {}", counts.running);
    println!("Failed:   {}", counts.failed);
    println!("Killed:   {}", counts.killed);
    println!("Done:     {}", counts.done);

    Ok(())
}

async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;

    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    }

    let result = db
        .execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE job_type = $1 AND status IN ('Failed', 'Killed')",
            [JOB_NAME_EMAIL.into()],
        ))
        .await?;

    tracing::info!(cleared = result.rows_affected(), "Cleared failed email jobs");
    println!("Cleared {} failed job(s) from the queue.", result.rows_affected());

    Ok(())
}
