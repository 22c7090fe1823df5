//! Service Container - Centralized service access.
//!
//! Handlers only see `Arc<dyn Trait>` services; the container wires them to
//! one shared Unit of Work.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, ContextResolver, DeliveryManager, DeliveryService, DraftManager,
    DraftService, EmailNotifier, FeedbackManager, FeedbackService, IdeaManager, IdeaService,
    Notifier, OrganizationContextResolver, OrganizationManager, OrganizationService,
    ScheduleManager, ScheduleService, SessionResolver, SessionService,
};
use crate::config::Config;
use crate::infra::{EmailQueue, Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;
    fn sessions(&self) -> Arc<dyn SessionResolver>;
    fn contexts(&self) -> Arc<dyn OrganizationContextResolver>;
    fn organizations(&self) -> Arc<dyn OrganizationService>;
    fn ideas(&self) -> Arc<dyn IdeaService>;
    fn drafts(&self) -> Arc<dyn DraftService>;
    fn feedback(&self) -> Arc<dyn FeedbackService>;
    fn schedules(&self) -> Arc<dyn ScheduleService>;
    fn deliveries(&self) -> Arc<dyn DeliveryService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    sessions: Arc<dyn SessionResolver>,
    contexts: Arc<dyn OrganizationContextResolver>,
    organizations: Arc<dyn OrganizationService>,
    ideas: Arc<dyn IdeaService>,
    drafts: Arc<dyn DraftService>,
    feedback: Arc<dyn FeedbackService>,
    schedules: Arc<dyn ScheduleService>,
    deliveries: Arc<dyn DeliveryService>,
}

impl Services {
    /// Build every service over the SeaORM-backed Unit of Work.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        queue: Option<EmailQueue>,
    ) -> Self {
        let notifier = Arc::new(EmailNotifier::new(queue, config.app_base_url.clone()));
        Self::from_unit_of_work(Arc::new(Persistence::new(db)), config, notifier)
    }

    /// Build every service over any Unit of Work; integration tests pass an
    /// in-memory one here.
    pub fn from_unit_of_work<U>(uow: Arc<U>, config: Config, notifier: Arc<dyn Notifier>) -> Self
    where
        U: UnitOfWork + 'static,
    {
        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config.clone())),
            sessions: Arc::new(SessionService::new(uow.clone(), config)),
            contexts: Arc::new(ContextResolver::new(uow.clone())),
            organizations: Arc::new(OrganizationManager::new(uow.clone())),
            ideas: Arc::new(IdeaManager::new(uow.clone(), notifier.clone())),
            drafts: Arc::new(DraftManager::new(uow.clone(), notifier)),
            feedback: Arc::new(FeedbackManager::new(uow.clone())),
            schedules: Arc::new(ScheduleManager::new(uow.clone())),
            deliveries: Arc::new(DeliveryManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn sessions(&self) -> Arc<dyn SessionResolver> {
        self.sessions.clone()
    }

    fn contexts(&self) -> Arc<dyn OrganizationContextResolver> {
        self.contexts.clone()
    }

    fn organizations(&self) -> Arc<dyn OrganizationService> {
        self.organizations.clone()
    }

    fn ideas(&self) -> Arc<dyn IdeaService> {
        self.ideas.clone()
    }

    fn drafts(&self) -> Arc<dyn DraftService> {
        self.drafts.clone()
    }

    fn feedback(&self) -> Arc<dyn FeedbackService> {
        self.feedback.clone()
    }

    fn schedules(&self) -> Arc<dyn ScheduleService> {
        self.schedules.clone()
    }

    fn deliveries(&self) -> Arc<dyn DeliveryService> {
        self.deliveries.clone()
    }
}
