//! Authentication service: registration, login and session tokens.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Session token claims. `role` is informational only; the session resolver
/// re-reads the user from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Token returned after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Lifetime in seconds
    #[schema(example = 2592000)]
    pub expires_in: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Option<UserRole>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user. Self-registration as ADMIN is refused.
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Check credentials and issue a session token.
    async fn login(&self, email: String, password: String) -> AppResult<(User, TokenResponse)>;

    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Lowercased and trimmed; e-mails are stored and compared in this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn issue_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.session_ttl_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: Some(user.role.to_string()),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.session_ttl_hours * SECONDS_PER_HOUR,
    })
}

pub fn decode_token(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        let role = registration.role.unwrap_or(UserRole::Client);
        if role == UserRole::Admin {
            return Err(AppError::forbidden("Admin accounts cannot self-register"));
        }

        let email = normalize_email(&registration.email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash,
                name: registration.name.trim().to_string(),
                role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<(User, TokenResponse)> {
        let user = self.uow.users().find_by_email(&normalize_email(&email)).await?;

        // Verify against a stand-in hash when the account is unknown so both
        // paths cost the same.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.as_str()),
            None => Password::timing_guard(),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => {
                let token = issue_token(&user, &self.config)?;
                tracing::info!(user_id = %user.id, "User logged in");
                Ok((user, token))
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.config)
    }
}
