//! Application route configuration.

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, StatusCode,
    },
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, delivery_routes, draft_routes, idea_routes, organization_routes,
    schedule_routes,
};
use super::middleware::{rate_limit_auth_middleware, rate_limit_middleware, session_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::SELECTED_ORGANIZATION_HEADER;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.app_base_url);

    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public authentication routes (stricter rate limiting)
        .nest(
            "/auth",
            auth_routes(state.clone()).route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .nest("/api", api_routes(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Everything under `/api` needs a session and counts against the general limit.
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/organization", organization_routes())
        .nest("/ideas", idea_routes())
        .nest("/drafts", draft_routes())
        .nest("/scheduled-posts", schedule_routes())
        .nest("/delivery-plans", delivery_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state, rate_limit_middleware))
}

/// Browser clients are served from `APP_BASE_URL` and send the session cookie.
fn cors_layer(app_base_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(SELECTED_ORGANIZATION_HEADER),
        ]);

    match app_base_url.trim_end_matches('/').parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin).allow_credentials(true),
        Err(_) => {
            tracing::warn!(app_base_url, "APP_BASE_URL is not a valid origin, CORS disabled");
            layer
        }
    }
}

async fn root() -> &'static str {
    "Content approval API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: ToString>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn disabled() -> Self {
        Self {
            status: "disabled",
            error: None,
        }
    }

    fn is_unhealthy(&self) -> bool {
        self.status == "unhealthy"
    }
}

/// Health check with database and Redis connectivity. Components that are
/// not configured report `disabled` and do not degrade the overall status.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.database {
        Some(db) => ServiceStatus::from_result(db.ping().await),
        None => ServiceStatus::disabled(),
    };

    let redis = match &state.cache {
        Some(cache) => ServiceStatus::from_result(cache.ping().await),
        None => ServiceStatus::disabled(),
    };

    let degraded = database.is_unhealthy() || redis.is_unhealthy();
    let response = HealthResponse {
        status: if degraded { "degraded" } else { "healthy" },
        services: ServiceHealth { database, redis },
    };

    let status_code = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status_code, Json(response))
}
