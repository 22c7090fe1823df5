//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Content approval backend: HTTP API, migrations, e-mail worker and relay
#[derive(Parser, Debug)]
#[command(name = "content-approval")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage the e-mail job queue
    Jobs(JobsArgs),

    /// Start the real-time WebSocket relay
    Relay(RelayArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, env = "SERVER_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT")]
    pub port: Option<u16>,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

#[derive(Parser, Debug)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub action: JobsAction,
}

#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// Start the e-mail worker
    Work,
    /// Show queue counts per status
    List,
    /// Remove failed e-mail jobs
    Clear,
}

#[derive(Parser, Debug)]
pub struct RelayArgs {
    /// Host to bind to
    #[arg(short = 'H', long, env = "RELAY_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "RELAY_PORT")]
    pub port: Option<u16>,
}
