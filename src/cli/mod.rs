//! Command-line interface.
//!
//! - `serve` - HTTP API server
//! - `migrate` - database migrations
//! - `jobs` - e-mail queue worker and maintenance
//! - `relay` - real-time WebSocket relay

pub mod args;

pub use args::{Cli, Commands};
