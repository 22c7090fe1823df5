use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::convert_all;
use super::entities::scheduled_post;
use crate::domain::{NewScheduledPost, ScheduleStatus, ScheduledPost};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn create(&self, post: NewScheduledPost) -> AppResult<ScheduledPost>;

    async fn find_in_org(&self, organization_id: Uuid, id: Uuid)
        -> AppResult<Option<ScheduledPost>>;

    /// Soonest first.
    async fn list(
        &self,
        organization_id: Uuid,
        status: Option<ScheduleStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ScheduledPost>, u64)>;

    /// SCHEDULED -> CANCELLED. `None` if the post is not SCHEDULED anymore.
    async fn cancel(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<ScheduledPost>>;

    /// Flip every SCHEDULED post of the draft to PUBLISHED; returns how many.
    async fn mark_published_for_draft(&self, organization_id: Uuid, draft_id: Uuid)
        -> AppResult<u64>;
}

pub struct ScheduleStore {
    db: DatabaseConnection,
}

impl ScheduleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn set_status(
        &self,
        organization_id: Uuid,
        filter_column: scheduled_post::Column,
        id: Uuid,
        to: ScheduleStatus,
    ) -> AppResult<u64> {
        let result = scheduled_post::Entity::update_many()
            .col_expr(scheduled_post::Column::Status, Expr::value(to.as_str()))
            .col_expr(scheduled_post::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(filter_column.eq(id))
            .filter(scheduled_post::Column::OrganizationId.eq(organization_id))
            .filter(scheduled_post::Column::Status.eq(ScheduleStatus::Scheduled.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl ScheduleRepository for ScheduleStore {
    async fn create(&self, post: NewScheduledPost) -> AppResult<ScheduledPost> {
        let now = Utc::now();
        let model = scheduled_post::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(post.organization_id),
            draft_id: Set(post.draft_id),
            platform: Set(post.platform.as_str().to_string()),
            scheduled_for: Set(post.scheduled_for),
            status: Set(ScheduleStatus::Scheduled.as_str().to_string()),
            created_by: Set(post.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        ScheduledPost::try_from(model)
    }

    async fn find_in_org(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> AppResult<Option<ScheduledPost>> {
        scheduled_post::Entity::find_by_id(id)
            .filter(scheduled_post::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .map(ScheduledPost::try_from)
            .transpose()
    }

    async fn list(
        &self,
        organization_id: Uuid,
        status: Option<ScheduleStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ScheduledPost>, u64)> {
        let mut query = scheduled_post::Entity::find()
            .filter(scheduled_post::Column::OrganizationId.eq(organization_id));
        if let Some(status) = status {
            query = query.filter(scheduled_post::Column::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_asc(scheduled_post::Column::ScheduledFor)
            .paginate(&self.db, pagination.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(pagination.page_index()).await?;

        Ok((convert_all(models)?, total))
    }

    async fn cancel(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<ScheduledPost>> {
        let changed = self
            .set_status(organization_id, scheduled_post::Column::Id, id, ScheduleStatus::Cancelled)
            .await?;
        if changed == 0 {
            return Ok(None);
        }
        self.find_in_org(organization_id, id).await
    }

    async fn mark_published_for_draft(
        &self,
        organization_id: Uuid,
        draft_id: Uuid,
    ) -> AppResult<u64> {
        self.set_status(
            organization_id,
            scheduled_post::Column::DraftId,
            draft_id,
            ScheduleStatus::Published,
        )
        .await
    }
}
