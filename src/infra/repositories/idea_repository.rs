use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::convert_all;
use super::entities::{idea, status_event};
use crate::domain::{Idea, IdeaFilter, IdeaStatus, NewIdea, NewStatusEvent};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdeaRepository: Send + Sync {
    async fn create(&self, idea: NewIdea) -> AppResult<Idea>;

    async fn find_in_org(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<Idea>>;

    /// Newest first, with the total count for pagination.
    async fn list(
        &self,
        organization_id: Uuid,
        filter: IdeaFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Idea>, u64)>;

    /// Write the editable fields of `idea`, but only while it is still
    /// PENDING. `None` when that no longer holds.
    async fn update_pending(&self, idea: Idea) -> AppResult<Option<Idea>>;

    async fn delete(&self, organization_id: Uuid, id: Uuid) -> AppResult<bool>;

    /// Compare-and-swap the status from `expected` and append `event` in the
    /// same transaction. `None` when another writer got there first.
    async fn transition_status(
        &self,
        idea: Idea,
        expected: IdeaStatus,
        event: NewStatusEvent,
    ) -> AppResult<Option<Idea>>;

    /// Linked idea counts per delivery item.
    async fn count_by_delivery_items(
        &self,
        organization_id: Uuid,
        item_ids: Vec<Uuid>,
    ) -> AppResult<HashMap<Uuid, u64>>;
}

pub struct IdeaStore {
    db: DatabaseConnection,
}

impl IdeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdeaRepository for IdeaStore {
    async fn create(&self, new_idea: NewIdea) -> AppResult<Idea> {
        let now = Utc::now();
        let model = idea::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(new_idea.organization_id),
            created_by: Set(new_idea.created_by),
            title: Set(new_idea.title),
            description: Set(new_idea.description),
            status: Set(IdeaStatus::Pending.as_str().to_string()),
            delivery_item_id: Set(new_idea.delivery_item_id),
            publishing_date: Set(new_idea.publishing_date),
            publishing_time: Set(new_idea.publishing_time),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Idea::try_from(model)
    }

    async fn find_in_org(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<Idea>> {
        idea::Entity::find_by_id(id)
            .filter(idea::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .map(Idea::try_from)
            .transpose()
    }

    async fn list(
        &self,
        organization_id: Uuid,
        filter: IdeaFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Idea>, u64)> {
        let mut query = idea::Entity::find().filter(idea::Column::OrganizationId.eq(organization_id));
        if let Some(status) = filter.status {
            query = query.filter(idea::Column::Status.eq(status.as_str()));
        }
        if let Some(item_id) = filter.delivery_item_id {
            query = query.filter(idea::Column::DeliveryItemId.eq(item_id));
        }

        let paginator = query
            .order_by_desc(idea::Column::CreatedAt)
            .paginate(&self.db, pagination.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(pagination.page_index()).await?;

        Ok((convert_all(models)?, total))
    }

    async fn update_pending(&self, updated: Idea) -> AppResult<Option<Idea>> {
        let result = idea::Entity::update_many()
            .col_expr(idea::Column::Title, Expr::value(updated.title.clone()))
            .col_expr(idea::Column::Description, Expr::value(updated.description.clone()))
            .col_expr(idea::Column::DeliveryItemId, Expr::value(updated.delivery_item_id))
            .col_expr(idea::Column::PublishingDate, Expr::value(updated.publishing_date))
            .col_expr(idea::Column::PublishingTime, Expr::value(updated.publishing_time))
            .col_expr(idea::Column::UpdatedAt, Expr::value(updated.updated_at))
            .filter(idea::Column::Id.eq(updated.id))
            .filter(idea::Column::OrganizationId.eq(updated.organization_id))
            .filter(idea::Column::Status.eq(IdeaStatus::Pending.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_in_org(updated.organization_id, updated.id).await
    }

    async fn delete(&self, organization_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = idea::Entity::delete_many()
            .filter(idea::Column::Id.eq(id))
            .filter(idea::Column::OrganizationId.eq(organization_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn transition_status(
        &self,
        updated: Idea,
        expected: IdeaStatus,
        event: NewStatusEvent,
    ) -> AppResult<Option<Idea>> {
        let txn = self.db.begin().await?;

        let result = idea::Entity::update_many()
            .col_expr(idea::Column::Status, Expr::value(updated.status.as_str()))
            .col_expr(idea::Column::UpdatedAt, Expr::value(updated.updated_at))
            .filter(idea::Column::Id.eq(updated.id))
            .filter(idea::Column::OrganizationId.eq(updated.organization_id))
            .filter(idea::Column::Status.eq(expected.as_str()))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        status_event::ActiveModel::from(event).insert(&txn).await?;
        let model = idea::Entity::find_by_id(updated.id).one(&txn).await?;
        txn.commit().await?;

        model.map(Idea::try_from).transpose()
    }

    async fn count_by_delivery_items(
        &self,
        organization_id: Uuid,
        item_ids: Vec<Uuid>,
    ) -> AppResult<HashMap<Uuid, u64>> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Option<Uuid>, i64)> = idea::Entity::find()
            .select_only()
            .column(idea::Column::DeliveryItemId)
            .column_as(idea::Column::Id.count(), "linked")
            .filter(idea::Column::OrganizationId.eq(organization_id))
            .filter(idea::Column::DeliveryItemId.is_in(item_ids))
            .group_by(idea::Column::DeliveryItemId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(item_id, count)| item_id.map(|id| (id, count.max(0) as u64)))
            .collect())
    }
}
