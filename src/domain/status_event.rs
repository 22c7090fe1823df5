//! Append-only audit record of entity status changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Idea,
    Draft,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Idea => "IDEA",
            EntityKind::Draft => "DRAFT",
        }
    }
}

/// Written in the same transaction as the status update it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStatusEvent {
    pub organization_id: Uuid,
    pub entity_kind: EntityKind,
    pub entity_id: Uuid,
    pub status: String,
    pub previous_status: String,
    pub changed_by: Uuid,
    pub reason: Option<String>,
    pub changed_at: DateTime<Utc>,
}
