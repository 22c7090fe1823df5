//! Comments on drafts and ideas.

use async_trait::async_trait;
use std::sync::Arc;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::{Feedback, FeedbackTarget, NewFeedback, OrganizationContext};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FeedbackService: Send + Sync {
    async fn add(
        &self,
        ctx: &OrganizationContext,
        target: FeedbackTarget,
        content: String,
    ) -> AppResult<Feedback>;

    async fn list(&self, ctx: &OrganizationContext, target: FeedbackTarget)
        -> AppResult<Vec<Feedback>>;
}

pub struct FeedbackManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FeedbackManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// The target must exist in the caller's organization.
    async fn ensure_target(&self, ctx: &OrganizationContext, target: FeedbackTarget) -> AppResult<()> {
        let found = match target {
            FeedbackTarget::Draft(id) => self
                .uow
                .drafts()
                .find_in_org(ctx.organization_id, id)
                .await?
                .is_some(),
            FeedbackTarget::Idea(id) => self
                .uow
                .ideas()
                .find_in_org(ctx.organization_id, id)
                .await?
                .is_some(),
        };
        if found {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> FeedbackService for FeedbackManager<U> {
    async fn add(
        &self,
        ctx: &OrganizationContext,
        target: FeedbackTarget,
        content: String,
    ) -> AppResult<Feedback> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(AppError::validation("Feedback cannot be empty"));
        }
        self.ensure_target(ctx, target).await?;

        let feedback = self
            .uow
            .feedback()
            .create(NewFeedback {
                organization_id: ctx.organization_id,
                author_id: ctx.user_id,
                target,
                content,
            })
            .await?;
        tracing::info!(feedback_id = %feedback.id, author_id = %ctx.user_id, "Feedback added");
        Ok(feedback)
    }

    async fn list(
        &self,
        ctx: &OrganizationContext,
        target: FeedbackTarget,
    ) -> AppResult<Vec<Feedback>> {
        self.ensure_target(ctx, target).await?;
        self.uow.feedback().list_for(ctx.organization_id, target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::{
        FeedbackRepository, IdeaRepository, MockFeedbackRepository, MockIdeaRepository,
        MockUnitOfWork,
    };
    use uuid::Uuid;

    fn ctx() -> OrganizationContext {
        OrganizationContext {
            organization_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_role: Some(UserRole::Client),
            organization_role: UserRole::Client,
            permissions: vec![],
            is_super_admin: false,
        }
    }

    fn manager(ideas: MockIdeaRepository, feedback: MockFeedbackRepository) -> FeedbackManager<MockUnitOfWork> {
        let ideas: Arc<dyn IdeaRepository> = Arc::new(ideas);
        let feedback: Arc<dyn FeedbackRepository> = Arc::new(feedback);
        let mut uow = MockUnitOfWork::new();
        uow.expect_ideas().returning(move || ideas.clone());
        uow.expect_feedback().returning(move || feedback.clone());
        FeedbackManager::new(Arc::new(uow))
    }

    #[tokio::test]
    async fn foreign_idea_is_not_found() {
        let mut ideas = MockIdeaRepository::new();
        ideas.expect_find_in_org().returning(|_, _| Ok(None));
        let mut feedback = MockFeedbackRepository::new();
        feedback.expect_create().never();

        let err = manager(ideas, feedback)
            .add(&ctx(), FeedbackTarget::Idea(Uuid::new_v4()), "Looks good".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn blank_feedback_is_rejected() {
        let err = manager(MockIdeaRepository::new(), MockFeedbackRepository::new())
            .add(&ctx(), FeedbackTarget::Idea(Uuid::new_v4()), "   ".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
