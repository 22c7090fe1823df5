//! HTTP request handlers.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

pub mod auth_handler;
pub mod delivery_handler;
pub mod draft_handler;
pub mod idea_handler;
pub mod organization_handler;
pub mod schedule_handler;

pub use auth_handler::auth_routes;
pub use delivery_handler::delivery_routes;
pub use draft_handler::draft_routes;
pub use idea_handler::idea_routes;
pub use organization_handler::organization_routes;
pub use schedule_handler::schedule_routes;

/// Comment body shared by idea and draft feedback endpoints.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FeedbackRequest {
    #[validate(length(min = 1, message = "Feedback content is required"))]
    #[schema(example = "Can we lead with the customer quote?")]
    pub content: String,
}
