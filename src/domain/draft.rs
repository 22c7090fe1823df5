//! ContentDraft: a piece of content attached to an idea and moved through
//! client review. Status changes are recorded in `metadata.statusHistory`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftStatus {
    Draft,
    AwaitingFeedback,
    AwaitingRevision,
    Approved,
    Rejected,
    Published,
}

impl DraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::Draft => "DRAFT",
            DraftStatus::AwaitingFeedback => "AWAITING_FEEDBACK",
            DraftStatus::AwaitingRevision => "AWAITING_REVISION",
            DraftStatus::Approved => "APPROVED",
            DraftStatus::Rejected => "REJECTED",
            DraftStatus::Published => "PUBLISHED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(DraftStatus::Draft),
            "AWAITING_FEEDBACK" => Some(DraftStatus::AwaitingFeedback),
            "AWAITING_REVISION" => Some(DraftStatus::AwaitingRevision),
            "APPROVED" => Some(DraftStatus::Approved),
            "REJECTED" => Some(DraftStatus::Rejected),
            "PUBLISHED" => Some(DraftStatus::Published),
            _ => None,
        }
    }

    /// Body and content type can only change while the creative owns the draft.
    pub fn is_editable(&self) -> bool {
        matches!(self, DraftStatus::Draft | DraftStatus::AwaitingRevision)
    }
}

impl std::fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Post,
    Article,
    Carousel,
    Video,
    Story,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Post => "POST",
            ContentType::Article => "ARTICLE",
            ContentType::Carousel => "CAROUSEL",
            ContentType::Video => "VIDEO",
            ContentType::Story => "STORY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "POST" => Some(ContentType::Post),
            "ARTICLE" => Some(ContentType::Article),
            "CAROUSEL" => Some(ContentType::Carousel),
            "VIDEO" => Some(ContentType::Video),
            "STORY" => Some(ContentType::Story),
            _ => None,
        }
    }
}

/// One entry of `metadata.statusHistory`. The camelCase field names are the
/// persisted shape and must stay readable by existing rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub status: String,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub previous_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ContentDraft {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub idea_id: Uuid,
    pub created_by: Uuid,
    pub body: String,
    pub content_type: ContentType,
    pub status: DraftStatus,
    #[schema(value_type = Object)]
    pub metadata: Value,
    /// Bumped on every write; used for compare-and-swap updates.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentDraft {
    /// Entries of `metadata.statusHistory`, skipping any that do not parse.
    pub fn status_history(&self) -> Vec<StatusHistoryEntry> {
        self.metadata
            .get("statusHistory")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| serde_json::from_value(e.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Append to `metadata.statusHistory`, creating the object or array when
    /// missing. Other metadata keys are left untouched.
    pub fn push_status_history(&mut self, entry: StatusHistoryEntry) {
        if !self.metadata.is_object() {
            self.metadata = json!({});
        }
        let entry = serde_json::to_value(entry).unwrap_or(Value::Null);
        if let Some(map) = self.metadata.as_object_mut() {
            let history = map
                .entry("statusHistory")
                .or_insert_with(|| Value::Array(Vec::new()));
            if !history.is_array() {
                *history = Value::Array(Vec::new());
            }
            if let Some(list) = history.as_array_mut() {
                list.push(entry);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDraft {
    pub organization_id: Uuid,
    pub idea_id: Uuid,
    pub created_by: Uuid,
    pub body: String,
    pub content_type: ContentType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftFilter {
    pub idea_id: Option<Uuid>,
    pub status: Option<DraftStatus>,
}
