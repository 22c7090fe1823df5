//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! Every organization-scoped operation takes the resolved
//! `OrganizationContext` and passes its organization id down to the
//! repositories.

mod auth_service;
pub mod container;
mod delivery_service;
mod draft_service;
mod feedback_service;
mod idea_service;
mod notifier;
mod organization_context;
mod organization_service;
mod schedule_service;
mod session_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{
    decode_token, issue_token, normalize_email, AuthService, Authenticator, Claims, Registration,
    TokenResponse,
};
pub use delivery_service::{DeliveryManager, DeliveryService, PlanInput};
pub use draft_service::{DraftChanges, DraftInput, DraftManager, DraftService, MediaInput};
pub use feedback_service::{FeedbackManager, FeedbackService};
pub use idea_service::{IdeaDraft, IdeaManager, IdeaService};
pub use notifier::{EmailNotifier, Notifier};
pub use organization_context::{ContextResolver, OrganizationContextResolver};
pub use organization_service::{MemberInvite, OrganizationManager, OrganizationService};
pub use schedule_service::{ScheduleManager, ScheduleService};
pub use session_service::{SessionResolver, SessionService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use notifier::MockNotifier;
#[cfg(any(test, feature = "test-utils"))]
pub use organization_context::MockOrganizationContextResolver;
