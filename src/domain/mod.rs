//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the status workflows. Nothing in here talks to
//! the database or the network.

pub mod delivery;
pub mod draft;
pub mod feedback;
pub mod idea;
pub mod media;
pub mod organization;
pub mod password;
pub mod schedule;
pub mod session;
pub mod status_event;
pub mod user;
pub mod workflow;

pub use delivery::{
    DeliveryItem, DeliveryItemProgress, DeliveryPlan, DeliveryPlanDetail, NewDeliveryItem,
    NewDeliveryPlan,
};
pub use draft::{ContentDraft, ContentType, DraftFilter, DraftStatus, NewDraft, StatusHistoryEntry};
pub use feedback::{Feedback, FeedbackTarget, NewFeedback};
pub use idea::{Idea, IdeaChanges, IdeaFilter, IdeaStatus, NewIdea};
pub use media::{Media, NewMedia};
pub use organization::{
    Membership, MembershipSummary, NewMembership, NewOrganization, Organization,
    OrganizationContext, SubscriptionStatus,
};
pub use password::Password;
pub use schedule::{NewScheduledPost, Platform, ScheduleStatus, ScheduledPost};
pub use session::{is_admin, is_client, is_creative, RoleHolder, Session};
pub use status_event::{EntityKind, NewStatusEvent};
pub use user::{NewUser, User, UserResponse, UserRole};
pub use workflow::{DraftWorkflow, IdeaWorkflow, TransitionError, Transitioned};
