//! Unit of Work: one place that hands out every repository.
//!
//! Multi-row writes that must be atomic (organization + owner membership,
//! plan + items, status CAS + audit event) open their SeaORM transaction
//! inside the repository method that performs them.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::repositories::{
    DeliveryRepository, DeliveryStore, DraftRepository, DraftStore, FeedbackRepository,
    FeedbackStore, IdeaRepository, IdeaStore, MediaRepository, MediaStore,
    OrganizationRepository, OrganizationStore, ScheduleRepository, ScheduleStore, UserRepository,
    UserStore,
};

/// Repository registry injected into every service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;
    fn organizations(&self) -> Arc<dyn OrganizationRepository>;
    fn ideas(&self) -> Arc<dyn IdeaRepository>;
    fn drafts(&self) -> Arc<dyn DraftRepository>;
    fn feedback(&self) -> Arc<dyn FeedbackRepository>;
    fn media(&self) -> Arc<dyn MediaRepository>;
    fn schedules(&self) -> Arc<dyn ScheduleRepository>;
    fn deliveries(&self) -> Arc<dyn DeliveryRepository>;
}

/// SeaORM-backed implementation of UnitOfWork
pub struct Persistence {
    users: Arc<UserStore>,
    organizations: Arc<OrganizationStore>,
    ideas: Arc<IdeaStore>,
    drafts: Arc<DraftStore>,
    feedback: Arc<FeedbackStore>,
    media: Arc<MediaStore>,
    schedules: Arc<ScheduleStore>,
    deliveries: Arc<DeliveryStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            organizations: Arc::new(OrganizationStore::new(db.clone())),
            ideas: Arc::new(IdeaStore::new(db.clone())),
            drafts: Arc::new(DraftStore::new(db.clone())),
            feedback: Arc::new(FeedbackStore::new(db.clone())),
            media: Arc::new(MediaStore::new(db.clone())),
            schedules: Arc::new(ScheduleStore::new(db.clone())),
            deliveries: Arc::new(DeliveryStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn organizations(&self) -> Arc<dyn OrganizationRepository> {
        self.organizations.clone()
    }

    fn ideas(&self) -> Arc<dyn IdeaRepository> {
        self.ideas.clone()
    }

    fn drafts(&self) -> Arc<dyn DraftRepository> {
        self.drafts.clone()
    }

    fn feedback(&self) -> Arc<dyn FeedbackRepository> {
        self.feedback.clone()
    }

    fn media(&self) -> Arc<dyn MediaRepository> {
        self.media.clone()
    }

    fn schedules(&self) -> Arc<dyn ScheduleRepository> {
        self.schedules.clone()
    }

    fn deliveries(&self) -> Arc<dyn DeliveryRepository> {
        self.deliveries.clone()
    }
}
