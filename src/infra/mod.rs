//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection, migrations and repositories
//! - Redis for rate limiting
//! - The PostgreSQL-backed e-mail queue
//! - Unit of Work handing repositories to services

pub mod cache;
pub mod db;
pub mod queue;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, RateLimitStatus};
pub use db::{Database, Migrator};
pub use queue::EmailQueue;
pub use repositories::{
    DeliveryRepository, DeliveryStore, DraftRepository, DraftStore, FeedbackRepository,
    FeedbackStore, IdeaRepository, IdeaStore, MediaRepository, MediaStore,
    OrganizationRepository, OrganizationStore, ScheduleRepository, ScheduleStore, UserRepository,
    UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockDeliveryRepository, MockDraftRepository, MockFeedbackRepository, MockIdeaRepository,
    MockMediaRepository, MockOrganizationRepository, MockScheduleRepository, MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockUnitOfWork;
