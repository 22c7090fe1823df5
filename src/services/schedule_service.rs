//! Scheduling approved drafts for publication.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::{
    DraftStatus, NewScheduledPost, OrganizationContext, Platform, ScheduleStatus, ScheduledPost,
    UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

const SCHEDULERS: &[UserRole] = &[UserRole::Creative, UserRole::Admin];

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ScheduleService: Send + Sync {
    /// Only APPROVED drafts, and only for a time in the future.
    async fn schedule(
        &self,
        ctx: &OrganizationContext,
        draft_id: Uuid,
        platform: Platform,
        scheduled_for: DateTime<Utc>,
    ) -> AppResult<ScheduledPost>;

    async fn list(
        &self,
        ctx: &OrganizationContext,
        status: Option<ScheduleStatus>,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<ScheduledPost>>;

    async fn cancel(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<ScheduledPost>;
}

pub struct ScheduleManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ScheduleManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ScheduleService for ScheduleManager<U> {
    async fn schedule(
        &self,
        ctx: &OrganizationContext,
        draft_id: Uuid,
        platform: Platform,
        scheduled_for: DateTime<Utc>,
    ) -> AppResult<ScheduledPost> {
        let draft = self
            .uow
            .drafts()
            .find_in_org(ctx.organization_id, draft_id)
            .await?
            .ok_or_not_found()?;
        ctx.require_role(SCHEDULERS, "Only creatives can schedule posts")?;

        if draft.status != DraftStatus::Approved {
            return Err(AppError::validation("Only approved drafts can be scheduled"));
        }
        if scheduled_for <= Utc::now() {
            return Err(AppError::validation("Scheduled time must be in the future"));
        }

        let post = self
            .uow
            .schedules()
            .create(NewScheduledPost {
                organization_id: draft.organization_id,
                draft_id: draft.id,
                platform,
                scheduled_for,
                created_by: ctx.user_id,
            })
            .await?;
        tracing::info!(post_id = %post.id, draft_id = %draft.id, scheduled_for = %post.scheduled_for, "Post scheduled");
        Ok(post)
    }

    async fn list(
        &self,
        ctx: &OrganizationContext,
        status: Option<ScheduleStatus>,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<ScheduledPost>> {
        let (posts, total) = self
            .uow
            .schedules()
            .list(ctx.organization_id, status, pagination)
            .await?;
        Ok(Paginated::new(posts, pagination, total))
    }

    async fn cancel(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<ScheduledPost> {
        let schedules = self.uow.schedules();
        let post = schedules
            .find_in_org(ctx.organization_id, id)
            .await?
            .ok_or_not_found()?;
        ctx.require_role(SCHEDULERS, "Only creatives can cancel scheduled posts")?;

        if post.status != ScheduleStatus::Scheduled {
            return Err(AppError::validation(format!(
                "Cannot cancel a post that is {}",
                post.status.as_str()
            )));
        }

        schedules
            .cancel(ctx.organization_id, id)
            .await?
            .ok_or_else(|| AppError::conflict("Scheduled post changed while cancelling"))
    }
}
