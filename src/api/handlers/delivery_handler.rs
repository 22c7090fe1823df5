//! Delivery plan handlers.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{OrgContext, Path, ValidatedJson};
use crate::api::AppState;
use crate::domain::{ContentType, DeliveryPlan, DeliveryPlanDetail, NewDeliveryItem};
use crate::errors::AppResult;
use crate::services::PlanInput;
use crate::types::Created;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct DeliveryItemRequest {
    pub content_type: ContentType,
    #[validate(range(min = 1, message = "Item quantity must be greater than zero"))]
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 120, message = "Plan name must be 1-120 characters"))]
    #[schema(example = "March content")]
    pub name: String,
    /// Any day of the month; stored as the first of the month
    #[schema(example = "2024-03-01")]
    pub month: NaiveDate,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "A delivery plan needs at least one item"), nested)]
    pub items: Vec<DeliveryItemRequest>,
}

pub fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:id", get(get_plan))
}

/// Delivery plans of the current organization, latest month first
#[utoipa::path(
    get,
    path = "/api/delivery-plans",
    tag = "Delivery plans",
    responses((status = 200, description = "Plans", body = [DeliveryPlan])),
    security(("bearer_auth" = []))
)]
pub async fn list_plans(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
) -> AppResult<Json<Vec<DeliveryPlan>>> {
    Ok(Json(state.delivery_service.list_plans(&ctx).await?))
}

/// Create a monthly plan with its items (admins only)
#[utoipa::path(
    post,
    path = "/api/delivery-plans",
    tag = "Delivery plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = DeliveryPlanDetail),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only admins can create delivery plans")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_plan(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    ValidatedJson(payload): ValidatedJson<CreatePlanRequest>,
) -> AppResult<Created<DeliveryPlanDetail>> {
    let input = PlanInput {
        name: payload.name,
        month: payload.month,
        description: payload.description,
        items: payload
            .items
            .into_iter()
            .map(|item| NewDeliveryItem {
                content_type: item.content_type,
                quantity: item.quantity,
                notes: item.notes,
            })
            .collect(),
    };
    Ok(Created(state.delivery_service.create_plan(&ctx, input).await?))
}

/// One plan with per-item progress
#[utoipa::path(
    get,
    path = "/api/delivery-plans/{id}",
    tag = "Delivery plans",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Plan detail", body = DeliveryPlanDetail),
        (status = 404, description = "Not found in this organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_plan(
    State(state): State<AppState>,
    OrgContext(ctx): OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeliveryPlanDetail>> {
    Ok(Json(state.delivery_service.get_plan(&ctx, id).await?))
}
