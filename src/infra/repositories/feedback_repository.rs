use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::feedback;
use crate::domain::{Feedback, FeedbackTarget, NewFeedback};
use crate::errors::AppResult;

/// Feedback is insert-only; there is no update or delete.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, feedback: NewFeedback) -> AppResult<Feedback>;

    /// Oldest first.
    async fn list_for(
        &self,
        organization_id: Uuid,
        target: FeedbackTarget,
    ) -> AppResult<Vec<Feedback>>;
}

pub struct FeedbackStore {
    db: DatabaseConnection,
}

impl FeedbackStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeedbackRepository for FeedbackStore {
    async fn create(&self, new_feedback: NewFeedback) -> AppResult<Feedback> {
        let model = feedback::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(new_feedback.organization_id),
            author_id: Set(new_feedback.author_id),
            draft_id: Set(new_feedback.target.draft_id()),
            idea_id: Set(new_feedback.target.idea_id()),
            content: Set(new_feedback.content),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(Feedback::from(model))
    }

    async fn list_for(
        &self,
        organization_id: Uuid,
        target: FeedbackTarget,
    ) -> AppResult<Vec<Feedback>> {
        let query = feedback::Entity::find().filter(feedback::Column::OrganizationId.eq(organization_id));
        let query = match target {
            FeedbackTarget::Draft(id) => query.filter(feedback::Column::DraftId.eq(id)),
            FeedbackTarget::Idea(id) => query.filter(feedback::Column::IdeaId.eq(id)),
        };

        let models = query
            .order_by_asc(feedback::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Feedback::from).collect())
    }
}
