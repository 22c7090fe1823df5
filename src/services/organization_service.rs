//! Organization switcher, creation and membership management.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::auth_service::normalize_email;
use crate::domain::{
    Membership, MembershipSummary, NewMembership, NewOrganization, Organization,
    OrganizationContext, Session, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

const ADMINS_ONLY: &str = "Only organization admins can manage members";

#[derive(Debug, Clone, PartialEq)]
pub struct MemberInvite {
    pub email: String,
    pub role: UserRole,
    pub permissions: Vec<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrganizationService: Send + Sync {
    async fn list_memberships(&self, session: &Session) -> AppResult<Vec<MembershipSummary>>;

    async fn get_organization(&self, ctx: &OrganizationContext) -> AppResult<Organization>;

    /// Any signed-in user may create one and becomes its ADMIN.
    async fn create_organization(
        &self,
        session: &Session,
        name: String,
        brand_color: Option<String>,
    ) -> AppResult<(Organization, Membership)>;

    /// Add an existing user, reactivating a previous membership if any.
    async fn add_member(&self, ctx: &OrganizationContext, invite: MemberInvite)
        -> AppResult<Membership>;

    /// Deactivate a membership. Admins cannot remove themselves.
    async fn remove_member(&self, ctx: &OrganizationContext, user_id: Uuid) -> AppResult<()>;
}

pub struct OrganizationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrganizationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrganizationService for OrganizationManager<U> {
    async fn list_memberships(&self, session: &Session) -> AppResult<Vec<MembershipSummary>> {
        self.uow
            .organizations()
            .list_active_memberships(session.real_user_id)
            .await
    }

    async fn get_organization(&self, ctx: &OrganizationContext) -> AppResult<Organization> {
        self.uow
            .organizations()
            .find_by_id(ctx.organization_id)
            .await?
            .ok_or_not_found()
    }

    async fn create_organization(
        &self,
        session: &Session,
        name: String,
        brand_color: Option<String>,
    ) -> AppResult<(Organization, Membership)> {
        let new_org = NewOrganization::from_name(&name, brand_color)?;
        self.uow
            .organizations()
            .create_with_owner(new_org, session.real_user_id)
            .await
    }

    async fn add_member(
        &self,
        ctx: &OrganizationContext,
        invite: MemberInvite,
    ) -> AppResult<Membership> {
        ctx.require_org_admin(ADMINS_ONLY)?;

        let email = normalize_email(&invite.email);
        let user = self
            .uow
            .users()
            .find_by_email(&email)
            .await?
            .ok_or_not_found()?;

        let organizations = self.uow.organizations();
        match organizations
            .find_membership(ctx.organization_id, user.id)
            .await?
        {
            Some(existing) if existing.is_active => Err(AppError::conflict(
                "User is already a member of this organization",
            )),
            Some(_) => {
                tracing::info!(organization_id = %ctx.organization_id, user_id = %user.id, "Reactivating membership");
                organizations
                    .set_membership_active(ctx.organization_id, user.id, true, Some(invite.role))
                    .await?
                    .ok_or_not_found()
            }
            None => {
                let membership = organizations
                    .add_member(NewMembership {
                        organization_id: ctx.organization_id,
                        user_id: user.id,
                        role: invite.role,
                        permissions: invite.permissions,
                        invited_at: Some(Utc::now()),
                    })
                    .await?;
                tracing::info!(
                    organization_id = %ctx.organization_id,
                    user_id = %user.id,
                    role = %invite.role,
                    invited_by = %ctx.user_id,
                    "Member added"
                );
                Ok(membership)
            }
        }
    }

    async fn remove_member(&self, ctx: &OrganizationContext, user_id: Uuid) -> AppResult<()> {
        ctx.require_org_admin(ADMINS_ONLY)?;
        if user_id == ctx.user_id {
            return Err(AppError::validation(
                "You cannot remove yourself from the organization",
            ));
        }

        let removed = self
            .uow
            .organizations()
            .set_membership_active(ctx.organization_id, user_id, false, None)
            .await?
            .ok_or_not_found()?;

        tracing::info!(organization_id = %ctx.organization_id, user_id = %removed.user_id, removed_by = %ctx.user_id, "Member deactivated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::infra::{
        MockOrganizationRepository, MockUnitOfWork, MockUserRepository, OrganizationRepository,
        UserRepository,
    };

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

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: String::new(),
            name: "Member".to_string(),
            role: UserRole::Client,
            is_super_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn membership(organization_id: Uuid, user_id: Uuid, active: bool) -> Membership {
        Membership {
            id: Uuid::new_v4(),
            organization_id,
            user_id,
            role: UserRole::Client,
            is_active: active,
            permissions: vec![],
            joined_at: Utc::now(),
            invited_at: None,
        }
    }

    fn manager(
        users: MockUserRepository,
        orgs: MockOrganizationRepository,
    ) -> OrganizationManager<MockUnitOfWork> {
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let orgs: Arc<dyn OrganizationRepository> = Arc::new(orgs);
        let mut uow = MockUnitOfWork::new();
        uow.expect_users().returning(move || users.clone());
        uow.expect_organizations().returning(move || orgs.clone());
        OrganizationManager::new(Arc::new(uow))
    }

    fn invite(email: &str) -> MemberInvite {
        MemberInvite {
            email: email.to_string(),
            role: UserRole::Client,
            permissions: vec![],
        }
    }

    #[tokio::test]
    async fn non_admins_cannot_add_members() {
        let service = manager(MockUserRepository::new(), MockOrganizationRepository::new());
        let err = service
            .add_member(&ctx(UserRole::Creative), invite("x@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn add_member_looks_up_normalized_email() {
        let admin = ctx(UserRole::Admin);
        let member = user("new@example.com");
        let member_id = member.id;
        let org_id = admin.organization_id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "new@example.com")
            .returning(move |_| Ok(Some(member.clone())));
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_membership().returning(|_, _| Ok(None));
        orgs.expect_add_member()
            .withf(move |m| m.organization_id == org_id && m.user_id == member_id)
            .returning(move |m| Ok(membership(m.organization_id, m.user_id, true)));

        let added = manager(users, orgs)
            .add_member(&admin, invite("  New@Example.com "))
            .await
            .unwrap();
        assert_eq!(added.user_id, member_id);
    }

    #[tokio::test]
    async fn inactive_membership_is_reactivated() {
        let admin = ctx(UserRole::Admin);
        let member = user("back@example.com");
        let member_id = member.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(member.clone())));
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_membership()
            .returning(|org, user| Ok(Some(membership(org, user, false))));
        orgs.expect_add_member().never();
        orgs.expect_set_membership_active()
            .withf(|_, _, active, role| *active && *role == Some(UserRole::Client))
            .returning(|org, user, _, _| Ok(Some(membership(org, user, true))));

        let restored = manager(users, orgs)
            .add_member(&admin, invite("back@example.com"))
            .await
            .unwrap();
        assert_eq!(restored.user_id, member_id);
        assert!(restored.is_active);
    }

    #[tokio::test]
    async fn active_membership_conflicts() {
        let admin = ctx(UserRole::Admin);
        let member = user("dup@example.com");

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(member.clone())));
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_membership()
            .returning(|org, user| Ok(Some(membership(org, user, true))));

        let err = manager(users, orgs)
            .add_member(&admin, invite("dup@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn admins_cannot_remove_themselves() {
        let admin = ctx(UserRole::Admin);
        let err = manager(MockUserRepository::new(), MockOrganizationRepository::new())
            .remove_member(&admin, admin.user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn removing_a_stranger_is_not_found() {
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_set_membership_active()
            .returning(|_, _, _, _| Ok(None));
        let err = manager(MockUserRepository::new(), orgs)
            .remove_member(&ctx(UserRole::Admin), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
