use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::{organization, organization_user};
use super::{conflict_on_unique, convert_all};
use crate::domain::{
    Membership, MembershipSummary, NewMembership, NewOrganization, Organization,
    SubscriptionStatus, UserRole,
};
use crate::errors::{AppError, AppResult};

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organization>>;

    /// Insert the organization and the creator's ADMIN membership atomically.
    async fn create_with_owner(
        &self,
        organization: NewOrganization,
        owner_id: Uuid,
    ) -> AppResult<(Organization, Membership)>;

    /// The membership for (user, organization) only if it is active.
    async fn find_active_membership(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> AppResult<Option<Membership>>;

    /// The most recently joined active membership of a user.
    async fn find_latest_active_membership(&self, user_id: Uuid) -> AppResult<Option<Membership>>;

    /// Membership regardless of `is_active`.
    async fn find_membership(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Membership>>;

    /// Active memberships of a user with their organizations, newest first.
    async fn list_active_memberships(&self, user_id: Uuid) -> AppResult<Vec<MembershipSummary>>;

    /// Active members of an organization, oldest first.
    async fn list_active_members(&self, organization_id: Uuid) -> AppResult<Vec<Membership>>;

    async fn add_member(&self, membership: NewMembership) -> AppResult<Membership>;

    /// Flip `is_active` (and optionally the role). `None` if the membership
    /// does not belong to the organization.
    async fn set_membership_active(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        active: bool,
        role: Option<UserRole>,
    ) -> AppResult<Option<Membership>>;
}

pub struct OrganizationStore {
    db: DatabaseConnection,
}

impl OrganizationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn membership_model(membership: NewMembership) -> organization_user::ActiveModel {
    organization_user::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(membership.organization_id),
        user_id: Set(membership.user_id),
        role: Set(membership.role.as_str().to_string()),
        is_active: Set(true),
        permissions: Set(json!(membership.permissions)),
        joined_at: Set(Utc::now()),
        invited_at: Set(membership.invited_at),
    }
}

#[async_trait]
impl OrganizationRepository for OrganizationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organization>> {
        organization::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Organization::try_from)
            .transpose()
    }

    async fn create_with_owner(
        &self,
        new_org: NewOrganization,
        owner_id: Uuid,
    ) -> AppResult<(Organization, Membership)> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let org = organization::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_org.name),
            slug: Set(new_org.slug),
            brand_color: Set(new_org.brand_color),
            subscription_status: Set(SubscriptionStatus::Trial.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| conflict_on_unique(e, "An organization with this name already exists"))?;

        let membership = membership_model(NewMembership {
            organization_id: org.id,
            user_id: owner_id,
            role: UserRole::Admin,
            permissions: Vec::new(),
            invited_at: None,
        })
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(organization_id = %org.id, owner_id = %owner_id, "Organization created");
        Ok((Organization::try_from(org)?, Membership::try_from(membership)?))
    }

    async fn find_active_membership(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> AppResult<Option<Membership>> {
        organization_user::Entity::find()
            .filter(organization_user::Column::UserId.eq(user_id))
            .filter(organization_user::Column::OrganizationId.eq(organization_id))
            .filter(organization_user::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .map(Membership::try_from)
            .transpose()
    }

    async fn find_latest_active_membership(&self, user_id: Uuid) -> AppResult<Option<Membership>> {
        organization_user::Entity::find()
            .filter(organization_user::Column::UserId.eq(user_id))
            .filter(organization_user::Column::IsActive.eq(true))
            .order_by_desc(organization_user::Column::JoinedAt)
            .order_by_desc(organization_user::Column::Id)
            .one(&self.db)
            .await?
            .map(Membership::try_from)
            .transpose()
    }

    async fn find_membership(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Membership>> {
        organization_user::Entity::find()
            .filter(organization_user::Column::OrganizationId.eq(organization_id))
            .filter(organization_user::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map(Membership::try_from)
            .transpose()
    }

    async fn list_active_memberships(&self, user_id: Uuid) -> AppResult<Vec<MembershipSummary>> {
        let rows = organization_user::Entity::find()
            .filter(organization_user::Column::UserId.eq(user_id))
            .filter(organization_user::Column::IsActive.eq(true))
            .order_by_desc(organization_user::Column::JoinedAt)
            .order_by_desc(organization_user::Column::Id)
            .find_also_related(organization::Entity)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(membership, org)| {
                let org = org.ok_or_else(|| {
                    AppError::internal(format!("Membership {} has no organization", membership.id))
                })?;
                let membership = Membership::try_from(membership)?;
                Ok(MembershipSummary {
                    organization: Organization::try_from(org)?,
                    role: membership.role,
                    permissions: membership.permissions,
                    joined_at: membership.joined_at,
                })
            })
            .collect()
    }

    async fn list_active_members(&self, organization_id: Uuid) -> AppResult<Vec<Membership>> {
        let models = organization_user::Entity::find()
            .filter(organization_user::Column::OrganizationId.eq(organization_id))
            .filter(organization_user::Column::IsActive.eq(true))
            .order_by_asc(organization_user::Column::JoinedAt)
            .all(&self.db)
            .await?;
        convert_all(models)
    }

    async fn add_member(&self, membership: NewMembership) -> AppResult<Membership> {
        let model = membership_model(membership)
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "User is already a member of this organization"))?;
        Membership::try_from(model)
    }

    async fn set_membership_active(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        active: bool,
        role: Option<UserRole>,
    ) -> AppResult<Option<Membership>> {
        let Some(existing) = organization_user::Entity::find()
            .filter(organization_user::Column::OrganizationId.eq(organization_id))
            .filter(organization_user::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let reactivating = active && !existing.is_active;
        let mut model: organization_user::ActiveModel = existing.into();
        model.is_active = Set(active);
        if let Some(role) = role {
            model.role = Set(role.as_str().to_string());
        }
        if reactivating {
            model.joined_at = Set(Utc::now());
        }

        let updated = model.update(&self.db).await?;
        Membership::try_from(updated).map(Some)
    }
}
