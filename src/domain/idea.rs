//! Idea: a content proposal reviewed by the client.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdeaStatus {
    Pending,
    Approved,
    Rejected,
}

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Pending => "PENDING",
            IdeaStatus::Approved => "APPROVED",
            IdeaStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(IdeaStatus::Pending),
            "APPROVED" => Some(IdeaStatus::Approved),
            "REJECTED" => Some(IdeaStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Idea {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: IdeaStatus,
    pub delivery_item_id: Option<Uuid>,
    pub publishing_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "09:30:00")]
    pub publishing_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIdea {
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub delivery_item_id: Option<Uuid>,
    pub publishing_date: Option<NaiveDate>,
    pub publishing_time: Option<NaiveTime>,
}

/// Partial update of the editable idea fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdeaChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub delivery_item_id: Option<Uuid>,
    pub publishing_date: Option<NaiveDate>,
    pub publishing_time: Option<NaiveTime>,
}

impl Idea {
    pub fn apply_changes(&mut self, changes: IdeaChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if changes.delivery_item_id.is_some() {
            self.delivery_item_id = changes.delivery_item_id;
        }
        if changes.publishing_date.is_some() {
            self.publishing_date = changes.publishing_date;
        }
        if changes.publishing_time.is_some() {
            self.publishing_time = changes.publishing_time;
        }
        self.updated_at = Utc::now();
    }
}

/// Optional filters for idea listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdeaFilter {
    pub status: Option<IdeaStatus>,
    pub delivery_item_id: Option<Uuid>,
}
