//! Idea proposals and their client review.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::Notifier;
use crate::domain::{
    Idea, IdeaChanges, IdeaFilter, IdeaStatus, IdeaWorkflow, NewIdea, OrganizationContext,
    UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

const AUTHORS: &[UserRole] = &[UserRole::Creative, UserRole::Admin];

/// Fields a creative supplies when proposing an idea.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdeaDraft {
    pub title: String,
    pub description: Option<String>,
    pub delivery_item_id: Option<Uuid>,
    pub publishing_date: Option<chrono::NaiveDate>,
    pub publishing_time: Option<chrono::NaiveTime>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdeaService: Send + Sync {
    async fn create(&self, ctx: &OrganizationContext, input: IdeaDraft) -> AppResult<Idea>;

    async fn list(
        &self,
        ctx: &OrganizationContext,
        filter: IdeaFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<Idea>>;

    async fn get(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<Idea>;

    /// Edit a PENDING idea.
    async fn update(&self, ctx: &OrganizationContext, id: Uuid, changes: IdeaChanges)
        -> AppResult<Idea>;

    /// Admins may delete any idea, everyone else only their own.
    async fn delete(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<()>;

    /// Client review: PENDING -> APPROVED | REJECTED.
    async fn update_status(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        status: IdeaStatus,
        reason: Option<String>,
    ) -> AppResult<Idea>;
}

pub struct IdeaManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> IdeaManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn Notifier>) -> Self {
        Self { uow, notifier }
    }

    async fn find(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<Idea> {
        self.uow
            .ideas()
            .find_in_org(ctx.organization_id, id)
            .await?
            .ok_or_not_found()
    }

    async fn ensure_delivery_item(
        &self,
        ctx: &OrganizationContext,
        item_id: Option<Uuid>,
    ) -> AppResult<()> {
        let Some(item_id) = item_id else {
            return Ok(());
        };
        match self
            .uow
            .deliveries()
            .find_item(ctx.organization_id, item_id)
            .await?
        {
            Some(_) => Ok(()),
            None => Err(AppError::validation(
                "Delivery item does not belong to this organization",
            )),
        }
    }

    async fn notify_author(&self, idea: &Idea) {
        match self.uow.users().find_by_id(idea.created_by).await {
            Ok(Some(author)) => self.notifier.idea_reviewed(idea, author).await,
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, idea_id = %idea.id, "Could not load idea author"),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> IdeaService for IdeaManager<U> {
    async fn create(&self, ctx: &OrganizationContext, input: IdeaDraft) -> AppResult<Idea> {
        ctx.require_role(AUTHORS, "Only creatives can create ideas")?;
        self.ensure_delivery_item(ctx, input.delivery_item_id).await?;

        let idea = self
            .uow
            .ideas()
            .create(NewIdea {
                organization_id: ctx.organization_id,
                created_by: ctx.user_id,
                title: input.title.trim().to_string(),
                description: input.description,
                delivery_item_id: input.delivery_item_id,
                publishing_date: input.publishing_date,
                publishing_time: input.publishing_time,
            })
            .await?;

        tracing::info!(idea_id = %idea.id, organization_id = %idea.organization_id, "Idea created");
        Ok(idea)
    }

    async fn list(
        &self,
        ctx: &OrganizationContext,
        filter: IdeaFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<Idea>> {
        let (ideas, total) = self
            .uow
            .ideas()
            .list(ctx.organization_id, filter, pagination)
            .await?;
        Ok(Paginated::new(ideas, pagination, total))
    }

    async fn get(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<Idea> {
        self.find(ctx, id).await
    }

    async fn update(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        changes: IdeaChanges,
    ) -> AppResult<Idea> {
        let mut idea = self.find(ctx, id).await?;
        ctx.require_role(AUTHORS, "Only creatives can edit ideas")?;
        if idea.status != IdeaStatus::Pending {
            return Err(AppError::validation("Only pending ideas can be edited"));
        }
        self.ensure_delivery_item(ctx, changes.delivery_item_id).await?;

        idea.apply_changes(changes);
        self.uow
            .ideas()
            .update_pending(idea)
            .await?
            .ok_or_else(|| AppError::conflict("Idea was reviewed while you were editing it"))
    }

    async fn delete(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<()> {
        let idea = self.find(ctx, id).await?;
        if !ctx.is_org_admin() && idea.created_by != ctx.user_id {
            return Err(AppError::forbidden("Only the author or an admin can delete this idea"));
        }

        if !self.uow.ideas().delete(ctx.organization_id, id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(idea_id = %id, deleted_by = %ctx.user_id, "Idea deleted");
        Ok(())
    }

    async fn update_status(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        status: IdeaStatus,
        reason: Option<String>,
    ) -> AppResult<Idea> {
        let idea = self.find(ctx, id).await?;
        let from = idea.status;
        let transitioned = IdeaWorkflow::apply_transition(&idea, status, ctx, reason)?;

        let updated = self
            .uow
            .ideas()
            .transition_status(transitioned.entity, from, transitioned.event)
            .await?
            .ok_or_else(|| AppError::conflict("Idea status was changed by someone else"))?;

        tracing::info!(
            idea_id = %updated.id,
            from = %from,
            to = %updated.status,
            changed_by = %ctx.user_id,
            "Idea status changed"
        );
        self.notify_author(&updated).await;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryItem, User};
    use crate::infra::{
        DeliveryRepository, IdeaRepository, MockDeliveryRepository, MockIdeaRepository,
        MockUnitOfWork, MockUserRepository, UserRepository,
    };
    use crate::services::MockNotifier;
    use chrono::Utc;

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

    fn idea(ctx: &OrganizationContext, status: IdeaStatus) -> Idea {
        Idea {
            id: Uuid::new_v4(),
            organization_id: ctx.organization_id,
            created_by: Uuid::new_v4(),
            title: "Behind the scenes".to_string(),
            description: None,
            status,
            delivery_item_id: None,
            publishing_date: None,
            publishing_time: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct Fixture {
        ideas: MockIdeaRepository,
        deliveries: MockDeliveryRepository,
        users: MockUserRepository,
        notifier: MockNotifier,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ideas: MockIdeaRepository::new(),
                deliveries: MockDeliveryRepository::new(),
                users: MockUserRepository::new(),
                notifier: MockNotifier::new(),
            }
        }

        fn build(self) -> IdeaManager<MockUnitOfWork> {
            let ideas: Arc<dyn IdeaRepository> = Arc::new(self.ideas);
            let deliveries: Arc<dyn DeliveryRepository> = Arc::new(self.deliveries);
            let users: Arc<dyn UserRepository> = Arc::new(self.users);
            let mut uow = MockUnitOfWork::new();
            uow.expect_ideas().returning(move || ideas.clone());
            uow.expect_deliveries().returning(move || deliveries.clone());
            uow.expect_users().returning(move || users.clone());
            IdeaManager::new(Arc::new(uow), Arc::new(self.notifier))
        }
    }

    #[tokio::test]
    async fn client_approves_pending_idea_and_author_is_notified() {
        let client = ctx(UserRole::Client);
        let pending = idea(&client, IdeaStatus::Pending);
        let author = User {
            id: pending.created_by,
            email: "creative@example.com".to_string(),
            password_hash: String::new(),
            name: "Creative".to_string(),
            role: UserRole::Creative,
            is_super_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut f = Fixture::new();
        let found = pending.clone();
        f.ideas
            .expect_find_in_org()
            .returning(move |_, _| Ok(Some(found.clone())));
        f.ideas
            .expect_transition_status()
            .withf(|idea, expected, event| {
                idea.status == IdeaStatus::Approved
                    && *expected == IdeaStatus::Pending
                    && event.previous_status == "PENDING"
            })
            .returning(|idea, _, _| Ok(Some(idea)));
        f.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(author.clone())));
        f.notifier.expect_idea_reviewed().times(1).return_const(());

        let updated = f
            .build()
            .update_status(&client, pending.id, IdeaStatus::Approved, None)
            .await
            .unwrap();
        assert_eq!(updated.status, IdeaStatus::Approved);
    }

    #[tokio::test]
    async fn creative_cannot_review_ideas() {
        let creative = ctx(UserRole::Creative);
        let pending = idea(&creative, IdeaStatus::Pending);

        let mut f = Fixture::new();
        f.ideas
            .expect_find_in_org()
            .returning(move |_, _| Ok(Some(pending.clone())));
        f.ideas.expect_transition_status().never();

        let err = f
            .build()
            .update_status(&creative, Uuid::new_v4(), IdeaStatus::Approved, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Only clients can update idea status");
    }

    #[tokio::test]
    async fn idea_of_another_organization_is_not_found() {
        let client = ctx(UserRole::Client);
        let mut f = Fixture::new();
        f.ideas
            .expect_find_in_org()
            .withf({
                let org = client.organization_id;
                move |o, _| *o == org
            })
            .returning(|_, _| Ok(None));

        let err = f
            .build()
            .update_status(&client, Uuid::new_v4(), IdeaStatus::Approved, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn lost_race_is_a_conflict() {
        let client = ctx(UserRole::Client);
        let pending = idea(&client, IdeaStatus::Pending);

        let mut f = Fixture::new();
        f.ideas
            .expect_find_in_org()
            .returning(move |_, _| Ok(Some(pending.clone())));
        f.ideas
            .expect_transition_status()
            .returning(|_, _, _| Ok(None));
        f.notifier.expect_idea_reviewed().never();

        let err = f
            .build()
            .update_status(&client, Uuid::new_v4(), IdeaStatus::Rejected, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn clients_cannot_create_ideas() {
        let err = Fixture::new()
            .build()
            .create(
                &ctx(UserRole::Client),
                IdeaDraft {
                    title: "x".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn foreign_delivery_item_is_rejected() {
        let creative = ctx(UserRole::Creative);
        let mut f = Fixture::new();
        f.deliveries
            .expect_find_item()
            .returning(|_, _| Ok(None::<DeliveryItem>));
        f.ideas.expect_create().never();

        let err = f
            .build()
            .create(
                &creative,
                IdeaDraft {
                    title: "Carousel".to_string(),
                    delivery_item_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn reviewed_ideas_cannot_be_edited() {
        let creative = ctx(UserRole::Creative);
        let approved = idea(&creative, IdeaStatus::Approved);

        let mut f = Fixture::new();
        f.ideas
            .expect_find_in_org()
            .returning(move |_, _| Ok(Some(approved.clone())));
        f.ideas.expect_update_pending().never();

        let err = f
            .build()
            .update(&creative, Uuid::new_v4(), IdeaChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn only_author_or_admin_deletes() {
        let creative = ctx(UserRole::Creative);
        let someone_elses = idea(&creative, IdeaStatus::Pending);

        let mut f = Fixture::new();
        f.ideas
            .expect_find_in_org()
            .returning(move |_, _| Ok(Some(someone_elses.clone())));
        f.ideas.expect_delete().never();

        let err = f
            .build()
            .delete(&creative, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
