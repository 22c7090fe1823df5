//! Repository layer - Data access abstraction
//!
//! Every business query takes the caller's organization id and filters on
//! it; a row of another organization is indistinguishable from a missing one.
//! Status writes are compare-and-swap updates that return `None` when the
//! expected state no longer holds.

mod delivery_repository;
mod draft_repository;
pub(crate) mod entities;
mod feedback_repository;
mod idea_repository;
mod media_repository;
mod organization_repository;
mod schedule_repository;
mod user_repository;

pub use delivery_repository::{DeliveryRepository, DeliveryStore};
pub use draft_repository::{DraftRepository, DraftStore};
pub use feedback_repository::{FeedbackRepository, FeedbackStore};
pub use idea_repository::{IdeaRepository, IdeaStore};
pub use media_repository::{MediaRepository, MediaStore};
pub use organization_repository::{OrganizationRepository, OrganizationStore};
pub use schedule_repository::{ScheduleRepository, ScheduleStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use delivery_repository::MockDeliveryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use draft_repository::MockDraftRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use feedback_repository::MockFeedbackRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use idea_repository::MockIdeaRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use media_repository::MockMediaRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use organization_repository::MockOrganizationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use schedule_repository::MockScheduleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

use sea_orm::{DbErr, SqlErr};

use crate::errors::{AppError, AppResult};

/// Unique-constraint violations become `Conflict`; everything else stays a
/// database error.
pub(crate) fn conflict_on_unique(err: DbErr, message: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(message),
        _ => AppError::Database(err),
    }
}

/// Convert a batch of models, failing on the first row that does not parse.
pub(crate) fn convert_all<M, T>(models: Vec<M>) -> AppResult<Vec<T>>
where
    T: TryFrom<M, Error = AppError>,
{
    models.into_iter().map(T::try_from).collect()
}
