//! Feedback: immutable comments left on a draft or an idea.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// What a comment is attached to. Exactly one target per comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTarget {
    Draft(Uuid),
    Idea(Uuid),
}

impl FeedbackTarget {
    pub fn draft_id(&self) -> Option<Uuid> {
        match self {
            FeedbackTarget::Draft(id) => Some(*id),
            FeedbackTarget::Idea(_) => None,
        }
    }

    pub fn idea_id(&self) -> Option<Uuid> {
        match self {
            FeedbackTarget::Idea(id) => Some(*id),
            FeedbackTarget::Draft(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Feedback {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub author_id: Uuid,
    pub draft_id: Option<Uuid>,
    pub idea_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub organization_id: Uuid,
    pub author_id: Uuid,
    pub target: FeedbackTarget,
    pub content: String,
}
