//! Scheduled post handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::{OrgContext, Path, Query};
use crate::api::AppState;
use crate::domain::{ScheduleStatus, ScheduledPost};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleListQuery {
    pub status: Option<ScheduleStatus>,
}

pub fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_scheduled_posts))
        .route("/:id", delete(cancel_scheduled_post))
}

/// Scheduled posts of the current organization, soonest first
#[utoipa::path(
    get,
    path = "/api/scheduled-posts",
    tag = "Scheduling",
    params(PaginationParams, ScheduleListQuery),
    responses((status = 200, description = "Paginated scheduled posts")),
    security(("bearer_auth" = []))
)]
pub async fn list_scheduled_posts(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ScheduleListQuery>,
) -> AppResult<Json<Paginated<ScheduledPost>>> {
    Ok(Json(
        state
            .schedule_service
            .list(&ctx, query.status, pagination)
            .await?,
    ))
}

/// Cancel a post that has not gone out yet
#[utoipa::path(
    delete,
    path = "/api/scheduled-posts/{id}",
    tag = "Scheduling",
    params(("id" = Uuid, Path, description = "Scheduled post id")),
    responses(
        (status = 200, description = "Cancelled", body = ScheduledPost),
        (status = 400, description = "Post is no longer scheduled"),
        (status = 404, description = "Not found in this organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_scheduled_post(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ScheduledPost>> {
    Ok(Json(state.schedule_service.cancel(&ctx, id).await?))
}
