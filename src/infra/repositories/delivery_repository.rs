use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::convert_all;
use super::entities::{delivery_item, delivery_plan};
use crate::domain::{DeliveryItem, DeliveryPlan, NewDeliveryPlan};
use crate::errors::AppResult;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Insert the plan and all of its items in one transaction.
    async fn create_plan(&self, plan: NewDeliveryPlan)
        -> AppResult<(DeliveryPlan, Vec<DeliveryItem>)>;

    /// Most recent month first.
    async fn list_plans(&self, organization_id: Uuid) -> AppResult<Vec<DeliveryPlan>>;

    async fn find_plan(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<DeliveryPlan>>;

    async fn list_items(&self, organization_id: Uuid, plan_id: Uuid)
        -> AppResult<Vec<DeliveryItem>>;

    async fn find_item(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<DeliveryItem>>;
}

pub struct DeliveryStore {
    db: DatabaseConnection,
}

impl DeliveryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeliveryRepository for DeliveryStore {
    async fn create_plan(
        &self,
        plan: NewDeliveryPlan,
    ) -> AppResult<(DeliveryPlan, Vec<DeliveryItem>)> {
        let txn = self.db.begin().await?;

        let plan_model = delivery_plan::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(plan.organization_id),
            name: Set(plan.name),
            month: Set(plan.month),
            description: Set(plan.description),
            created_by: Set(plan.created_by),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(plan.items.len());
        for item in plan.items {
            let model = delivery_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                plan_id: Set(plan_model.id),
                organization_id: Set(plan_model.organization_id),
                content_type: Set(item.content_type.as_str().to_string()),
                quantity: Set(item.quantity),
                notes: Set(item.notes),
            }
            .insert(&txn)
            .await?;
            items.push(DeliveryItem::try_from(model)?);
        }

        txn.commit().await?;
        Ok((DeliveryPlan::from(plan_model), items))
    }

    async fn list_plans(&self, organization_id: Uuid) -> AppResult<Vec<DeliveryPlan>> {
        let models = delivery_plan::Entity::find()
            .filter(delivery_plan::Column::OrganizationId.eq(organization_id))
            .order_by_desc(delivery_plan::Column::Month)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(DeliveryPlan::from).collect())
    }

    async fn find_plan(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<DeliveryPlan>> {
        Ok(delivery_plan::Entity::find_by_id(id)
            .filter(delivery_plan::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .map(DeliveryPlan::from))
    }

    async fn list_items(
        &self,
        organization_id: Uuid,
        plan_id: Uuid,
    ) -> AppResult<Vec<DeliveryItem>> {
        let models = delivery_item::Entity::find()
            .filter(delivery_item::Column::OrganizationId.eq(organization_id))
            .filter(delivery_item::Column::PlanId.eq(plan_id))
            .all(&self.db)
            .await?;
        convert_all(models)
    }

    async fn find_item(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<DeliveryItem>> {
        delivery_item::Entity::find_by_id(id)
            .filter(delivery_item::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .map(DeliveryItem::try_from)
            .transpose()
    }
}
