//! Content draft handlers: authoring, review cycle, media and scheduling.

use axum::{
    extract::State,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::FeedbackRequest;
use crate::api::extractors::{OptionalValidatedJson, OrgContext, Path, Query, ValidatedJson};
use crate::api::AppState;
use crate::config::MAX_REASON_LENGTH;
use crate::domain::{
    ContentDraft, ContentType, DraftFilter, DraftStatus, Feedback, FeedbackTarget, Media,
    Platform, ScheduledPost,
};
use crate::errors::AppResult;
use crate::services::{DraftChanges, DraftInput, MediaInput};
use crate::types::{Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDraftRequest {
    pub idea_id: Uuid,
    #[serde(default)]
    pub body: String,
    pub content_type: ContentType,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDraftRequest {
    pub body: Option<String>,
    pub content_type: Option<ContentType>,
    /// Version the client last saw; a mismatch is rejected with 409
    pub version: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DraftStatusRequest {
    pub status: DraftStatus,
    #[validate(length(max = MAX_REASON_LENGTH, message = "Reason is too long"))]
    pub reason: Option<String>,
}

/// Optional note for submit, rework and publish.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct TransitionNote {
    #[validate(length(max = MAX_REASON_LENGTH, message = "Reason is too long"))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMediaRequest {
    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub file_name: String,
    #[validate(length(min = 1, message = "MIME type is required"))]
    #[schema(example = "image/png")]
    pub mime_type: String,
    #[validate(range(min = 1, message = "File size must be positive"))]
    pub size_bytes: i64,
    #[validate(url(message = "Invalid media URL"))]
    pub url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScheduleDraftRequest {
    #[serde(default)]
    pub platform: Platform,
    pub scheduled_for: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DraftListQuery {
    pub idea_id: Option<Uuid>,
    pub status: Option<DraftStatus>,
}

pub fn draft_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drafts).post(create_draft))
        .route("/:id", get(get_draft).patch(update_draft))
        .route("/:id/submit", post(submit_draft))
        .route("/:id/status", patch(update_draft_status))
        .route("/:id/rework", post(rework_draft))
        .route("/:id/publish", post(publish_draft))
        .route("/:id/feedback", get(list_draft_feedback).post(add_draft_feedback))
        .route("/:id/media", get(list_media).post(add_media))
        .route("/:id/schedule", post(schedule_draft))
}

/// List drafts of the current organization
#[utoipa::path(
    get,
    path = "/api/drafts",
    tag = "Drafts",
    params(PaginationParams, DraftListQuery),
    responses((status = 200, description = "Paginated drafts, most recently updated first")),
    security(("bearer_auth" = []))
)]
pub async fn list_drafts(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<DraftListQuery>,
) -> AppResult<Json<Paginated<ContentDraft>>> {
    let filter = DraftFilter {
        idea_id: query.idea_id,
        status: query.status,
    };
    Ok(Json(state.draft_service.list(&ctx, filter, pagination).await?))
}

/// Start a draft for an idea
#[utoipa::path(
    post,
    path = "/api/drafts",
    tag = "Drafts",
    request_body = CreateDraftRequest,
    responses(
        (status = 201, description = "Draft created", body = ContentDraft),
        (status = 403, description = "Only creatives can create drafts"),
        (status = 404, description = "Idea not found in this organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_draft(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    ValidatedJson(payload): ValidatedJson<CreateDraftRequest>,
) -> AppResult<Created<ContentDraft>> {
    let draft = state
        .draft_service
        .create(
            &ctx,
            DraftInput {
                idea_id: payload.idea_id,
                body: payload.body,
                content_type: payload.content_type,
            },
        )
        .await?;
    Ok(Created(draft))
}

/// Get one draft
#[utoipa::path(
    get,
    path = "/api/drafts/{id}",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Draft", body = ContentDraft),
        (status = 404, description = "Not found in this organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_draft(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContentDraft>> {
    Ok(Json(state.draft_service.get(&ctx, id).await?))
}

/// Edit body or content type
#[utoipa::path(
    patch,
    path = "/api/drafts/{id}",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = UpdateDraftRequest,
    responses(
        (status = 200, description = "Draft updated", body = ContentDraft),
        (status = 400, description = "Draft is not editable in its status"),
        (status = 404, description = "Not found in this organization"),
        (status = 409, description = "Stale version")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_draft(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDraftRequest>,
) -> AppResult<Json<ContentDraft>> {
    let changes = DraftChanges {
        body: payload.body,
        content_type: payload.content_type,
        expected_version: payload.version,
    };
    Ok(Json(state.draft_service.update(&ctx, id, changes).await?))
}

/// Submit for client review (DRAFT -> AWAITING_FEEDBACK)
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/submit",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = TransitionNote,
    responses(
        (status = 200, description = "Submitted", body = ContentDraft),
        (status = 400, description = "Invalid status transition"),
        (status = 403, description = "Only creatives can submit drafts for review"),
        (status = 409, description = "Status changed concurrently")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_draft(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    OptionalValidatedJson(note): OptionalValidatedJson<TransitionNote>,
) -> AppResult<Json<ContentDraft>> {
    let reason = note.and_then(|note| note.reason);
    let draft = state
        .draft_service
        .transition(&ctx, id, DraftStatus::AwaitingFeedback, reason)
        .await?;
    Ok(Json(draft))
}

/// Move a draft along the review cycle
#[utoipa::path(
    patch,
    path = "/api/drafts/{id}/status",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = DraftStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ContentDraft),
        (status = 400, description = "Invalid status transition"),
        (status = 403, description = "Role may not drive this transition"),
        (status = 404, description = "Not found in this organization"),
        (status = 409, description = "Status changed concurrently")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_draft_status(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<DraftStatusRequest>,
) -> AppResult<Json<ContentDraft>> {
    let draft = state
        .draft_service
        .transition(&ctx, id, payload.status, payload.reason)
        .await?;
    Ok(Json(draft))
}

/// Take a draft back for rework (AWAITING_REVISION -> DRAFT)
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/rework",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = TransitionNote,
    responses(
        (status = 200, description = "Back in DRAFT", body = ContentDraft),
        (status = 400, description = "Invalid status transition"),
        (status = 403, description = "Only creatives can rework drafts")
    ),
    security(("bearer_auth" = []))
)]
pub async fn rework_draft(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    OptionalValidatedJson(note): OptionalValidatedJson<TransitionNote>,
) -> AppResult<Json<ContentDraft>> {
    let reason = note.and_then(|note| note.reason);
    let draft = state
        .draft_service
        .transition(&ctx, id, DraftStatus::Draft, reason)
        .await?;
    Ok(Json(draft))
}

/// Publish an approved draft and mark its scheduled posts published
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/publish",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = TransitionNote,
    responses(
        (status = 200, description = "Published", body = ContentDraft),
        (status = 400, description = "Invalid status transition"),
        (status = 403, description = "Only creatives can publish drafts")
    ),
    security(("bearer_auth" = []))
)]
pub async fn publish_draft(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    OptionalValidatedJson(note): OptionalValidatedJson<TransitionNote>,
) -> AppResult<Json<ContentDraft>> {
    let reason = note.and_then(|note| note.reason);
    let draft = state
        .draft_service
        .transition(&ctx, id, DraftStatus::Published, reason)
        .await?;
    Ok(Json(draft))
}

/// Comments on a draft, oldest first
#[utoipa::path(
    get,
    path = "/api/drafts/{id}/feedback",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses((status = 200, description = "Feedback", body = [Feedback])),
    security(("bearer_auth" = []))
)]
pub async fn list_draft_feedback(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Feedback>>> {
    Ok(Json(
        state
            .feedback_service
            .list(&ctx, FeedbackTarget::Draft(id))
            .await?,
    ))
}

/// Comment on a draft
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/feedback",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Feedback added", body = Feedback),
        (status = 404, description = "Not found in this organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_draft_feedback(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<FeedbackRequest>,
) -> AppResult<Created<Feedback>> {
    let feedback = state
        .feedback_service
        .add(&ctx, FeedbackTarget::Draft(id), payload.content)
        .await?;
    Ok(Created(feedback))
}

/// Media attached to a draft
#[utoipa::path(
    get,
    path = "/api/drafts/{id}/media",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses((status = 200, description = "Media", body = [Media])),
    security(("bearer_auth" = []))
)]
pub async fn list_media(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Media>>> {
    Ok(Json(state.draft_service.list_media(&ctx, id).await?))
}

/// Register uploaded media for a draft
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/media",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = AddMediaRequest,
    responses(
        (status = 201, description = "Media registered", body = Media),
        (status = 404, description = "Not found in this organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_media(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AddMediaRequest>,
) -> AppResult<Created<Media>> {
    let media = state
        .draft_service
        .add_media(
            &ctx,
            id,
            MediaInput {
                file_name: payload.file_name,
                mime_type: payload.mime_type,
                size_bytes: payload.size_bytes,
                url: payload.url,
            },
        )
        .await?;
    Ok(Created(media))
}

/// Schedule an approved draft for publication
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/schedule",
    tag = "Drafts",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = ScheduleDraftRequest,
    responses(
        (status = 201, description = "Scheduled", body = ScheduledPost),
        (status = 400, description = "Draft not approved or time in the past"),
        (status = 404, description = "Not found in this organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn schedule_draft(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ScheduleDraftRequest>,
) -> AppResult<Created<ScheduledPost>> {
    let post = state
        .schedule_service
        .schedule(&ctx, id, payload.platform, payload.scheduled_for)
        .await?;
    Ok(Created(post))
}
