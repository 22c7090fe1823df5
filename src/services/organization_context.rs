//! Organization-context resolution.
//!
//! Both public contracts run the same `resolve`:
//!
//! 1. An explicit organization requires an active membership in it, whatever
//!    the user's global role. Otherwise `Forbidden`.
//! 2. Without one, the most recently joined active membership is used.
//!    Otherwise `NoActiveOrganization`.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::{Membership, OrganizationContext, Session};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrganizationContextResolver: Send + Sync {
    /// Soft contract: `None` when the user has no usable organization.
    async fn get_organization_context(
        &self,
        session: &Session,
        explicit_organization_id: Option<Uuid>,
    ) -> Option<OrganizationContext>;

    /// Hard contract: the resolution error is returned to the caller.
    async fn require_organization_context(
        &self,
        session: &Session,
        explicit_organization_id: Option<Uuid>,
    ) -> AppResult<OrganizationContext>;
}

pub struct ContextResolver<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ContextResolver<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn resolve(
        &self,
        session: &Session,
        explicit_organization_id: Option<Uuid>,
    ) -> AppResult<OrganizationContext> {
        let organizations = self.uow.organizations();
        let user_id = session.real_user_id;

        let membership = match explicit_organization_id {
            Some(organization_id) => organizations
                .find_active_membership(user_id, organization_id)
                .await?
                .ok_or_else(|| {
                    tracing::debug!(%user_id, %organization_id, "No active membership for selected organization");
                    AppError::forbidden("You do not have access to this organization")
                })?,
            None => organizations
                .find_latest_active_membership(user_id)
                .await?
                .ok_or(AppError::NoActiveOrganization)?,
        };

        Ok(context_from(session, membership))
    }
}

fn context_from(session: &Session, membership: Membership) -> OrganizationContext {
    OrganizationContext {
        organization_id: membership.organization_id,
        user_id: session.real_user_id,
        user_role: session.user_role,
        organization_role: membership.role,
        permissions: membership.permissions,
        is_super_admin: session.is_super_admin,
    }
}

#[async_trait]
impl<U: UnitOfWork> OrganizationContextResolver for ContextResolver<U> {
    async fn get_organization_context(
        &self,
        session: &Session,
        explicit_organization_id: Option<Uuid>,
    ) -> Option<OrganizationContext> {
        match self.resolve(session, explicit_organization_id).await {
            Ok(ctx) => Some(ctx),
            Err(AppError::Forbidden(_)) | Err(AppError::NoActiveOrganization) => None,
            Err(e) => {
                tracing::error!(error = %e, user_id = %session.real_user_id, "Organization context lookup failed");
                None
            }
        }
    }

    async fn require_organization_context(
        &self,
        session: &Session,
        explicit_organization_id: Option<Uuid>,
    ) -> AppResult<OrganizationContext> {
        self.resolve(session, explicit_organization_id).await
    }
}
