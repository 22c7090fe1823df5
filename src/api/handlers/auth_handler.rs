//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::session_middleware;
use crate::api::AppState;
use crate::config::{MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH, SESSION_COOKIE_NAME};
use crate::domain::{Session, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::{Registration, TokenResponse};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "creative@agency.example")]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(min = MIN_NAME_LENGTH, message = "Name is required"))]
    #[schema(example = "Jamie Doe")]
    pub name: String,
    /// CREATIVE or CLIENT; defaults to CLIENT
    pub role: Option<UserRole>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "creative@agency.example")]
    pub email: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: TokenResponse,
}

/// The resolved identity plus the stored profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub session: Session,
    pub user: UserResponse,
}

/// Create authentication routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, session_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(protected)
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Role cannot be self-assigned"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .auth_service
        .register(Registration {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            role: payload.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Log in; sets the `session-token` cookie and also returns the token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let (user, token) = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    let jar = jar.add(session_cookie(
        token.access_token.clone(),
        state.config.cookie_secure,
    ));
    Ok((
        jar,
        Json(LoginResponse {
            user: UserResponse::from(user),
            token,
        }),
    ))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses((status = 204, description = "Session cookie cleared"))
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(session_cookie(String::new(), state.config.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}

/// Current session identity
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<Json<MeResponse>> {
    let user = state.auth_service.get_user(session.real_user_id).await?;
    Ok(Json(MeResponse {
        session,
        user: UserResponse::from(user),
    }))
}
