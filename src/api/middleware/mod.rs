//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{session_middleware, session_token};
pub use rate_limit::{rate_limit_auth_middleware, rate_limit_middleware};
