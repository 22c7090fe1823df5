//! Media records. Only metadata lives here; the blobs are stored elsewhere.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Media {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub draft_id: Uuid,
    pub uploaded_by: Uuid,
    pub file_name: String,
    #[schema(example = "image/png")]
    pub mime_type: String,
    pub size_bytes: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMedia {
    pub organization_id: Uuid,
    pub draft_id: Uuid,
    pub uploaded_by: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub url: String,
}
