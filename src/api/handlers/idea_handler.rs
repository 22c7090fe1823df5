//! Idea handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, patch},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::FeedbackRequest;
use crate::api::extractors::{OrgContext, Path, Query, ValidatedJson};
use crate::api::AppState;
use crate::config::{MAX_REASON_LENGTH, MAX_TITLE_LENGTH};
use crate::domain::{Feedback, FeedbackTarget, Idea, IdeaChanges, IdeaFilter, IdeaStatus};
use crate::errors::AppResult;
use crate::services::IdeaDraft;
use crate::types::{Created, NoContent, Paginated, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIdeaRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be 1-200 characters"))]
    #[schema(example = "Customer story: onboarding in 5 minutes")]
    pub title: String,
    pub description: Option<String>,
    pub delivery_item_id: Option<Uuid>,
    pub publishing_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "09:30:00")]
    pub publishing_time: Option<NaiveTime>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateIdeaRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub delivery_item_id: Option<Uuid>,
    pub publishing_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "09:30:00")]
    pub publishing_time: Option<NaiveTime>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateIdeaStatusRequest {
    pub status: IdeaStatus,
    #[validate(length(max = MAX_REASON_LENGTH, message = "Reason is too long"))]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdeaListQuery {
    pub status: Option<IdeaStatus>,
    pub delivery_item_id: Option<Uuid>,
}

pub fn idea_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ideas).post(create_idea))
        .route("/:id", get(get_idea).patch(update_idea).delete(delete_idea))
        .route("/:id/status", patch(update_idea_status))
        .route("/:id/feedback", get(list_idea_feedback).post(add_idea_feedback))
}

/// List ideas of the current organization
#[utoipa::path(
    get,
    path = "/api/ideas",
    tag = "Ideas",
    params(PaginationParams, IdeaListQuery),
    responses((status = 200, description = "Paginated ideas, newest first")),
    security(("bearer_auth" = []))
)]
pub async fn list_ideas(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<IdeaListQuery>,
) -> AppResult<Json<Paginated<Idea>>> {
    let filter = IdeaFilter {
        status: query.status,
        delivery_item_id: query.delivery_item_id,
    };
    Ok(Json(state.idea_service.list(&ctx, filter, pagination).await?))
}

/// Propose an idea
#[utoipa::path(
    post,
    path = "/api/ideas",
    tag = "Ideas",
    request_body = CreateIdeaRequest,
    responses(
        (status = 201, description = "Idea created", body = Idea),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only creatives can create ideas")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_idea(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    ValidatedJson(payload): ValidatedJson<CreateIdeaRequest>,
) -> AppResult<Created<Idea>> {
    let idea = state
        .idea_service
        .create(
            &ctx,
            IdeaDraft {
                title: payload.title,
                description: payload.description,
                delivery_item_id: payload.delivery_item_id,
                publishing_date: payload.publishing_date,
                publishing_time: payload.publishing_time,
            },
        )
        .await?;
    Ok(Created(idea))
}

/// Get one idea
#[utoipa::path(
    get,
    path = "/api/ideas/{id}",
    tag = "Ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Idea", body = Idea),
        (status = 404, description = "Not found in this organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_idea(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Idea>> {
    Ok(Json(state.idea_service.get(&ctx, id).await?))
}

/// Edit a pending idea
#[utoipa::path(
    patch,
    path = "/api/ideas/{id}",
    tag = "Ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    request_body = UpdateIdeaRequest,
    responses(
        (status = 200, description = "Idea updated", body = Idea),
        (status = 400, description = "Idea is no longer pending"),
        (status = 404, description = "Not found in this organization"),
        (status = 409, description = "Idea was reviewed concurrently")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_idea(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateIdeaRequest>,
) -> AppResult<Json<Idea>> {
    let changes = IdeaChanges {
        title: payload.title,
        description: payload.description,
        delivery_item_id: payload.delivery_item_id,
        publishing_date: payload.publishing_date,
        publishing_time: payload.publishing_time,
    };
    Ok(Json(state.idea_service.update(&ctx, id, changes).await?))
}

/// Delete an idea
#[utoipa::path(
    delete,
    path = "/api/ideas/{id}",
    tag = "Ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses(
        (status = 204, description = "Idea deleted"),
        (status = 403, description = "Not the author or an admin"),
        (status = 404, description = "Not found in this organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_idea(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.idea_service.delete(&ctx, id).await?;
    Ok(NoContent)
}

/// Approve or reject a pending idea
#[utoipa::path(
    patch,
    path = "/api/ideas/{id}/status",
    tag = "Ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    request_body = UpdateIdeaStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Idea),
        (status = 400, description = "Invalid status transition"),
        (status = 403, description = "Only clients can update idea status"),
        (status = 404, description = "Not found in this organization"),
        (status = 409, description = "Status changed concurrently")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_idea_status(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateIdeaStatusRequest>,
) -> AppResult<Json<Idea>> {
    let idea = state
        .idea_service
        .update_status(&ctx, id, payload.status, payload.reason)
        .await?;
    Ok(Json(idea))
}

/// Comments on an idea, oldest first
#[utoipa::path(
    get,
    path = "/api/ideas/{id}/feedback",
    tag = "Ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses((status = 200, description = "Feedback", body = [Feedback])),
    security(("bearer_auth" = []))
)]
pub async fn list_idea_feedback(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Feedback>>> {
    Ok(Json(
        state
            .feedback_service
            .list(&ctx, FeedbackTarget::Idea(id))
            .await?,
    ))
}

/// Comment on an idea
#[utoipa::path(
    post,
    path = "/api/ideas/{id}/feedback",
    tag = "Ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Feedback added", body = Feedback),
        (status = 404, description = "Not found in this organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_idea_feedback(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<FeedbackRequest>,
) -> AppResult<Created<Feedback>> {
    let feedback = state
        .feedback_service
        .add(&ctx, FeedbackTarget::Idea(id), payload.content)
        .await?;
    Ok(Created(feedback))
}
