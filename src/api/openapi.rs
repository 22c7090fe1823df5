//! OpenAPI documentation served through Swagger UI.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, delivery_handler, draft_handler, idea_handler, organization_handler,
    schedule_handler, FeedbackRequest,
};
use crate::config::{SELECTED_ORGANIZATION_HEADER, SESSION_COOKIE_NAME};
use crate::domain::{
    ContentDraft, ContentType, DeliveryItem, DeliveryItemProgress, DeliveryPlan,
    DeliveryPlanDetail, DraftStatus, Feedback, Idea, IdeaStatus, Media, Membership,
    MembershipSummary, Organization, OrganizationContext, Platform, ScheduleStatus, ScheduledPost,
    Session, StatusHistoryEntry, SubscriptionStatus, UserResponse, UserRole,
};
use crate::services::TokenResponse;
use crate::types::{MessageResponse, PaginationMeta};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Content Approval API",
        version = "0.1.0",
        description = "Multi-tenant content approval: ideas, drafts, client review and publishing. \
                       Organization-scoped endpoints read the `x-selected-organization` header.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "http://localhost:3000", description = "Local development server")),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::me,
        organization_handler::list_organizations,
        organization_handler::current_organization,
        organization_handler::create_organization,
        organization_handler::add_member,
        organization_handler::remove_member,
        idea_handler::list_ideas,
        idea_handler::create_idea,
        idea_handler::get_idea,
        idea_handler::update_idea,
        idea_handler::delete_idea,
        idea_handler::update_idea_status,
        idea_handler::list_idea_feedback,
        idea_handler::add_idea_feedback,
        draft_handler::list_drafts,
        draft_handler::create_draft,
        draft_handler::get_draft,
        draft_handler::update_draft,
        draft_handler::submit_draft,
        draft_handler::update_draft_status,
        draft_handler::rework_draft,
        draft_handler::publish_draft,
        draft_handler::list_draft_feedback,
        draft_handler::add_draft_feedback,
        draft_handler::list_media,
        draft_handler::add_media,
        draft_handler::schedule_draft,
        schedule_handler::list_scheduled_posts,
        schedule_handler::cancel_scheduled_post,
        delivery_handler::list_plans,
        delivery_handler::create_plan,
        delivery_handler::get_plan,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            Session,
            TokenResponse,
            MessageResponse,
            PaginationMeta,
            Organization,
            SubscriptionStatus,
            Membership,
            MembershipSummary,
            OrganizationContext,
            Idea,
            IdeaStatus,
            ContentDraft,
            ContentType,
            DraftStatus,
            StatusHistoryEntry,
            Feedback,
            Media,
            ScheduledPost,
            ScheduleStatus,
            Platform,
            DeliveryPlan,
            DeliveryItem,
            DeliveryItemProgress,
            DeliveryPlanDetail,
            FeedbackRequest,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::LoginResponse,
            auth_handler::MeResponse,
            organization_handler::CreateOrganizationRequest,
            organization_handler::AddMemberRequest,
            organization_handler::CreatedOrganization,
            organization_handler::CurrentOrganization,
            idea_handler::CreateIdeaRequest,
            idea_handler::UpdateIdeaRequest,
            idea_handler::UpdateIdeaStatusRequest,
            draft_handler::CreateDraftRequest,
            draft_handler::UpdateDraftRequest,
            draft_handler::DraftStatusRequest,
            draft_handler::TransitionNote,
            draft_handler::AddMediaRequest,
            draft_handler::ScheduleDraftRequest,
            delivery_handler::CreatePlanRequest,
            delivery_handler::DeliveryItemRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the session cookie"),
        (name = "Organizations", description = "Memberships and the active organization"),
        (name = "Ideas", description = "Content proposals and client review"),
        (name = "Drafts", description = "Drafts, review cycle, media and feedback"),
        (name = "Scheduling", description = "Scheduled publication of approved drafts"),
        (name = "Delivery plans", description = "Monthly content targets")
    )
)]
pub struct ApiDoc;

/// Session token as a bearer header or the session cookie.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(format!(
                            "Session token from /auth/login, also accepted as the `{}` cookie. \
                             Pick an organization with the `{}` header.",
                            SESSION_COOKIE_NAME, SELECTED_ORGANIZATION_HEADER
                        )))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
            );
        }
    }
}
