//! Scheduled publication of approved drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Scheduled,
    Published,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "SCHEDULED",
            ScheduleStatus::Published => "PUBLISHED",
            ScheduleStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SCHEDULED" => Some(ScheduleStatus::Scheduled),
            "PUBLISHED" => Some(ScheduleStatus::Published),
            "CANCELLED" => Some(ScheduleStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    #[default]
    Linkedin,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linkedin => "LINKEDIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LINKEDIN" => Some(Platform::Linkedin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScheduledPost {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub draft_id: Uuid,
    pub platform: Platform,
    pub scheduled_for: DateTime<Utc>,
    pub status: ScheduleStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewScheduledPost {
    pub organization_id: Uuid,
    pub draft_id: Uuid,
    pub platform: Platform,
    pub scheduled_for: DateTime<Utc>,
    pub created_by: Uuid,
}
