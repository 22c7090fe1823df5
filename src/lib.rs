//! Multi-tenant content approval backend.
//!
//! Agencies (creatives) propose ideas and write drafts; clients review them
//! inside their organization. Every request resolves a session from the
//! token, then a single organization context, and every read or write is
//! scoped to that organization.
//!
//! # Layers
//!
//! - **cli** / **commands**: `serve`, `migrate`, `jobs`, `relay`
//! - **config**: environment settings and constants
//! - **domain**: entities, role predicates and the status workflows
//! - **services**: session and organization resolution, content use cases
//! - **infra**: SeaORM repositories, migrations, Redis, the e-mail queue
//! - **api**: axum handlers, extractors, middleware and routes
//! - **realtime**: WebSocket relay
//! - **jobs**: background e-mail job
//! - **types** / **errors**: shared response types and `AppError`

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod realtime;
pub mod services;
pub mod types;

pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{OrganizationContext, Session, User, UserRole};
pub use errors::{AppError, AppResult};
