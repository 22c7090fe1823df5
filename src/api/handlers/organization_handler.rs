//! Organization switcher and membership handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{MaybeOrgContext, OrgContext, Path, ValidatedJson};
use crate::api::AppState;
use crate::domain::{Membership, MembershipSummary, Organization, OrganizationContext, Session, UserRole};
use crate::errors::AppResult;
use crate::services::MemberInvite;
use crate::types::{Created, NoContent};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    #[schema(example = "Acme Marketing")]
    pub name: String,
    #[schema(example = "#1E40AF")]
    pub brand_color: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMemberRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedOrganization {
    pub organization: Organization,
    pub membership: Membership,
}

/// `null` context when the user has no usable organization.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentOrganization {
    pub context: Option<OrganizationContext>,
    pub organization: Option<Organization>,
}

pub fn organization_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_organization))
        .route("/list", get(list_organizations))
        .route("/current", get(current_organization))
        .route("/members", post(add_member))
        .route("/members/:user_id", delete(remove_member))
}

/// Organizations the user is an active member of
#[utoipa::path(
    get,
    path = "/api/organization/list",
    tag = "Organizations",
    responses((status = 200, description = "Active memberships", body = [MembershipSummary])),
    security(("bearer_auth" = []))
)]
pub async fn list_organizations(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<Json<Vec<MembershipSummary>>> {
    Ok(Json(
        state.organization_service.list_memberships(&session).await?,
    ))
}

/// The organization this request resolves to, if any
#[utoipa::path(
    get,
    path = "/api/organization/current",
    tag = "Organizations",
    params(("x-selected-organization" = Option<Uuid>, Header, description = "Explicit organization")),
    responses(
        (status = 200, description = "Resolved context or null", body = CurrentOrganization),
        (status = 400, description = "Malformed organization id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn current_organization(
    State(state): State<AppState>,
    MaybeOrgContext(ctx): MaybeOrgContext,
) -> AppResult<Json<CurrentOrganization>> {
    let organization = match &ctx {
        Some(ctx) => Some(state.organization_service.get_organization(ctx).await?),
        None => None,
    };
    Ok(Json(CurrentOrganization {
        context: ctx,
        organization,
    }))
}

/// Create an organization; the caller becomes its admin
#[utoipa::path(
    post,
    path = "/api/organization",
    tag = "Organizations",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 201, description = "Organization created", body = CreatedOrganization),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already taken")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_organization(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(payload): ValidatedJson<CreateOrganizationRequest>,
) -> AppResult<Created<CreatedOrganization>> {
    let (organization, membership) = state
        .organization_service
        .create_organization(&session, payload.name, payload.brand_color)
        .await?;
    Ok(Created(CreatedOrganization {
        organization,
        membership,
    }))
}

/// Add an existing user to the current organization
#[utoipa::path(
    post,
    path = "/api/organization/members",
    tag = "Organizations",
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = Membership),
        (status = 403, description = "Not an organization admin"),
        (status = 404, description = "No user with that email"),
        (status = 409, description = "Already a member")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_member(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    ValidatedJson(payload): ValidatedJson<AddMemberRequest>,
) -> AppResult<Created<Membership>> {
    let membership = state
        .organization_service
        .add_member(
            &ctx,
            MemberInvite {
                email: payload.email,
                role: payload.role,
                permissions: payload.permissions,
            },
        )
        .await?;
    Ok(Created(membership))
}

/// Deactivate a member of the current organization
#[utoipa::path(
    delete,
    path = "/api/organization/members/{user_id}",
    tag = "Organizations",
    params(("user_id" = Uuid, Path, description = "Member user id")),
    responses(
        (status = 204, description = "Member deactivated"),
        (status = 400, description = "Cannot remove yourself"),
        (status = 403, description = "Not an organization admin"),
        (status = 404, description = "Not a member")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_member(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(user_id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .organization_service
        .remove_member(&ctx, user_id)
        .await?;
    Ok(NoContent)
}
