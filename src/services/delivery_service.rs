//! Monthly delivery plans and their progress.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::{
    DeliveryItemProgress, DeliveryPlan, DeliveryPlanDetail, NewDeliveryItem, NewDeliveryPlan,
    OrganizationContext,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanInput {
    pub name: String,
    pub month: chrono::NaiveDate,
    pub description: Option<String>,
    pub items: Vec<NewDeliveryItem>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DeliveryService: Send + Sync {
    /// Admin only. The plan and its items are stored together.
    async fn create_plan(&self, ctx: &OrganizationContext, input: PlanInput)
        -> AppResult<DeliveryPlanDetail>;

    async fn list_plans(&self, ctx: &OrganizationContext) -> AppResult<Vec<DeliveryPlan>>;

    /// The plan with linked idea counts per item.
    async fn get_plan(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<DeliveryPlanDetail>;
}

pub struct DeliveryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DeliveryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DeliveryService for DeliveryManager<U> {
    async fn create_plan(
        &self,
        ctx: &OrganizationContext,
        input: PlanInput,
    ) -> AppResult<DeliveryPlanDetail> {
        ctx.require_org_admin("Only admins can create delivery plans")?;

        let new_plan = NewDeliveryPlan {
            organization_id: ctx.organization_id,
            name: input.name.trim().to_string(),
            month: input.month,
            description: input.description,
            created_by: ctx.user_id,
            items: input.items,
        }
        .validated()?;

        let (plan, items) = self.uow.deliveries().create_plan(new_plan).await?;
        tracing::info!(plan_id = %plan.id, items = items.len(), month = %plan.month, "Delivery plan created");

        Ok(DeliveryPlanDetail {
            plan,
            items: items
                .into_iter()
                .map(|item| DeliveryItemProgress::new(item, 0))
                .collect(),
        })
    }

    async fn list_plans(&self, ctx: &OrganizationContext) -> AppResult<Vec<DeliveryPlan>> {
        self.uow.deliveries().list_plans(ctx.organization_id).await
    }

    async fn get_plan(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<DeliveryPlanDetail> {
        let deliveries = self.uow.deliveries();
        let plan = deliveries
            .find_plan(ctx.organization_id, id)
            .await?
            .ok_or_not_found()?;
        let items = deliveries.list_items(ctx.organization_id, plan.id).await?;

        let item_ids = items.iter().map(|item| item.id).collect();
        let counts = self
            .uow
            .ideas()
            .count_by_delivery_items(ctx.organization_id, item_ids)
            .await?;

        let items = items
            .into_iter()
            .map(|item| {
                let linked = counts.get(&item.id).copied().unwrap_or(0);
                DeliveryItemProgress::new(item, linked)
            })
            .collect();

        Ok(DeliveryPlanDetail { plan, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentType, DeliveryItem, UserRole};
    use crate::errors::AppError;
    use crate::infra::{
        DeliveryRepository, IdeaRepository, MockDeliveryRepository, MockIdeaRepository,
        MockUnitOfWork,
    };
    use chrono::{NaiveDate, Utc};
    use std::collections::HashMap;

    fn ctx(role: UserRole) -> OrganizationContext {
        OrganizationContext {
            organization_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_role: Some(role),
            organization_role: role,
            permissions: vec![],
            is_super_admin: false,
        }
    }

    fn manager(deliveries: MockDeliveryRepository, ideas: MockIdeaRepository) -> DeliveryManager<MockUnitOfWork> {
        let deliveries: Arc<dyn DeliveryRepository> = Arc::new(deliveries);
        let ideas: Arc<dyn IdeaRepository> = Arc::new(ideas);
        let mut uow = MockUnitOfWork::new();
        uow.expect_deliveries().returning(move || deliveries.clone());
        uow.expect_ideas().returning(move || ideas.clone());
        DeliveryManager::new(Arc::new(uow))
    }

    #[tokio::test]
    async fn creatives_cannot_create_plans() {
        let err = manager(MockDeliveryRepository::new(), MockIdeaRepository::new())
            .create_plan(
                &ctx(UserRole::Creative),
                PlanInput {
                    name: "April".to_string(),
                    month: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                    description: None,
                    items: vec![],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn detail_counts_linked_ideas_per_item() {
        let admin = ctx(UserRole::Admin);
        let plan = DeliveryPlan {
            id: Uuid::new_v4(),
            organization_id: admin.organization_id,
            name: "May".to_string(),
            month: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            description: None,
            created_by: admin.user_id,
            created_at: Utc::now(),
        };
        let item = |quantity| DeliveryItem {
            id: Uuid::new_v4(),
            plan_id: plan.id,
            organization_id: admin.organization_id,
            content_type: ContentType::Post,
            quantity,
            notes: None,
        };
        let items = vec![item(4), item(1)];
        let first = items[0].id;

        let mut deliveries = MockDeliveryRepository::new();
        let found = plan.clone();
        deliveries
            .expect_find_plan()
            .returning(move |_, _| Ok(Some(found.clone())));
        deliveries
            .expect_list_items()
            .returning(move |_, _| Ok(items.clone()));
        let mut ideas = MockIdeaRepository::new();
        ideas
            .expect_count_by_delivery_items()
            .returning(move |_, _| Ok(HashMap::from([(first, 3)])));

        let detail = manager(deliveries, ideas)
            .get_plan(&admin, plan.id)
            .await
            .unwrap();
        assert_eq!(detail.items[0].linked_ideas, 3);
        assert_eq!(detail.items[0].remaining, 1);
        assert_eq!(detail.items[1].linked_ideas, 0);
        assert_eq!(detail.items[1].remaining, 1);
    }
}
