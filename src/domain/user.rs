//! User domain entity and the global role enumeration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_CLIENT, ROLE_CREATIVE};
use crate::errors::AppError;

/// Roles, used both globally on a user and per organization membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Creative,
    Client,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Creative => ROLE_CREATIVE,
            UserRole::Client => ROLE_CLIENT,
        }
    }

    /// Parse a stored role. Unknown values yield `None` so callers fail closed.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            ROLE_ADMIN => Some(UserRole::Admin),
            ROLE_CREATIVE => Some(UserRole::Creative),
            ROLE_CLIENT => Some(UserRole::Client),
            _ => None,
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::parse(s).ok_or_else(|| AppError::validation(format!("Unknown role: {}", s)))
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "client@example.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub role: UserRole,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            is_super_admin: user.is_super_admin,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_strings() {
        for role in [UserRole::Admin, UserRole::Creative, UserRole::Client] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_role_does_not_parse() {
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::parse(""), None);
        assert!("OWNER".parse::<UserRole>().is_err());
    }

    #[test]
    fn role_serializes_screaming_case() {
        let json = serde_json::to_string(&UserRole::Creative).unwrap();
        assert_eq!(json, "\"CREATIVE\"");
    }
}
