//! Session resolver: session token -> canonical user identity.

use async_trait::async_trait;
use std::sync::Arc;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::auth_service::decode_token;
use crate::config::Config;
use crate::domain::Session;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Decode the token and re-read its user by e-mail. The returned id is
    /// always the stored one. Any failure is `Unauthorized`.
    async fn resolve(&self, token: &str) -> AppResult<Session>;
}

pub struct SessionService<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> SessionService<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> SessionResolver for SessionService<U> {
    async fn resolve(&self, token: &str) -> AppResult<Session> {
        let claims = decode_token(token, &self.config).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::Unauthorized
        })?;

        let user = self
            .uow
            .users()
            .find_by_email(&claims.email)
            .await?
            .ok_or_else(|| {
                tracing::debug!(email = %claims.email, "Session names an unknown user");
                AppError::Unauthorized
            })?;

        if user.id != claims.sub {
            tracing::warn!(
                token_subject = %claims.sub,
                stored_id = %user.id,
                email = %user.email,
                "Session subject differs from stored user id; using stored id"
            );
        }

        Ok(Session {
            real_user_id: user.id,
            user_email: user.email,
            user_role: Some(user.role),
            is_super_admin: user.is_super_admin,
        })
    }
}
