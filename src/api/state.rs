//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, EmailQueue};
use crate::services::{
    AuthService, DeliveryService, DraftService, FeedbackService, IdeaService,
    OrganizationContextResolver, OrganizationService, ScheduleService, ServiceContainer,
    SessionResolver, Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub session_resolver: Arc<dyn SessionResolver>,
    pub context_resolver: Arc<dyn OrganizationContextResolver>,
    pub organization_service: Arc<dyn OrganizationService>,
    pub idea_service: Arc<dyn IdeaService>,
    pub draft_service: Arc<dyn DraftService>,
    pub feedback_service: Arc<dyn FeedbackService>,
    pub schedule_service: Arc<dyn ScheduleService>,
    pub delivery_service: Arc<dyn DeliveryService>,
    /// Redis for rate limiting; limits are skipped when absent
    pub cache: Option<Arc<Cache>>,
    /// Database handle used by the health check
    pub database: Option<Arc<Database>>,
    pub config: Config,
}

impl AppState {
    /// Wire every service over the SeaORM connection.
    pub fn from_config(
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
        queue: Option<EmailQueue>,
        config: Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), config.clone(), queue);
        Self::new(&container, cache, Some(database), config)
    }

    /// Create state from any service container.
    pub fn new(
        container: &dyn ServiceContainer,
        cache: Option<Arc<Cache>>,
        database: Option<Arc<Database>>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: container.auth(),
            session_resolver: container.sessions(),
            context_resolver: container.contexts(),
            organization_service: container.organizations(),
            idea_service: container.ideas(),
            draft_service: container.drafts(),
            feedback_service: container.feedback(),
            schedule_service: container.schedules(),
            delivery_service: container.deliveries(),
            cache,
            database,
            config,
        }
    }
}
