//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models. Enum
//! columns are stored as text and parsed on the way out.

pub mod content_draft;
pub mod delivery_item;
pub mod delivery_plan;
pub mod feedback;
pub mod idea;
pub mod media;
pub mod organization;
pub mod organization_user;
pub mod scheduled_post;
pub mod status_event;
pub mod user;

use crate::errors::{AppError, AppResult};

/// Parse a text enum column, reporting the offending value when it is unknown.
pub(crate) fn parse_column<T>(
    value: &str,
    column: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> AppResult<T> {
    parse(value).ok_or_else(|| AppError::internal(format!("Unknown {} value: {}", column, value)))
}
