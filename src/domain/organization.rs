//! Organizations (tenants), memberships and the resolved request context.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::session::{is_admin, is_client, is_creative, RoleHolder};
use super::UserRole;
use crate::errors::{AppError, AppResult};

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

static BRAND_COLOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"));

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid separator regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    PastDue,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trial => "TRIAL",
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::PastDue => "PAST_DUE",
            SubscriptionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TRIAL" => Some(SubscriptionStatus::Trial),
            "ACTIVE" => Some(SubscriptionStatus::Active),
            "PAST_DUE" => Some(SubscriptionStatus::PastDue),
            "CANCELLED" => Some(SubscriptionStatus::Cancelled),
            _ => None,
        }
    }
}

/// Tenant boundary. Every business entity carries an organization id.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[schema(example = "#1E40AF")]
    pub brand_color: Option<String>,
    pub subscription_status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrganization {
    pub name: String,
    pub slug: String,
    pub brand_color: Option<String>,
}

impl NewOrganization {
    /// Validate the name and color and derive the slug from the name.
    pub fn from_name(name: &str, brand_color: Option<String>) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Organization name is required"));
        }
        if let Some(color) = brand_color.as_deref() {
            validate_brand_color(color)?;
        }
        let slug = slugify(name);
        validate_slug(&slug)?;

        Ok(Self {
            name: name.to_string(),
            slug,
            brand_color,
        })
    }
}

/// Lowercase, collapse everything that is not `[a-z0-9]` into single dashes.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

pub fn validate_slug(slug: &str) -> AppResult<()> {
    if SLUG_PATTERN.is_match(slug) {
        Ok(())
    } else {
        Err(AppError::validation(
            "Organization name must contain at least one letter or digit",
        ))
    }
}

pub fn validate_brand_color(color: &str) -> AppResult<()> {
    if BRAND_COLOR_PATTERN.is_match(color) {
        Ok(())
    } else {
        Err(AppError::validation("Brand color must look like #RRGGBB"))
    }
}

/// OrganizationUser: a user's membership in one organization.
/// Removal flips `is_active`; rows are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Membership {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_active: bool,
    pub permissions: Vec<String>,
    pub joined_at: DateTime<Utc>,
    pub invited_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMembership {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
    pub permissions: Vec<String>,
    pub invited_at: Option<DateTime<Utc>>,
}

/// A membership joined with its organization, for the organization switcher.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MembershipSummary {
    pub organization: Organization,
    pub role: UserRole,
    pub permissions: Vec<String>,
    pub joined_at: DateTime<Utc>,
}

/// The single organization a request operates against.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrganizationContext {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    /// Global role of the user
    pub user_role: Option<UserRole>,
    /// Role granted by the membership in this organization
    pub organization_role: UserRole,
    pub permissions: Vec<String>,
    #[serde(skip)]
    pub is_super_admin: bool,
}

impl RoleHolder for OrganizationContext {
    fn global_role(&self) -> Option<UserRole> {
        self.user_role
    }

    fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }
}

impl OrganizationContext {
    /// Role the caller works in on content inside this organization.
    ///
    /// Global admins act as ADMIN. Otherwise the global role must be backed
    /// by the membership: a matching membership role, or an ADMIN membership.
    /// `None` when the two disagree or the global role is unknown.
    pub fn effective_role(&self) -> Option<UserRole> {
        let me = Some(self);
        if is_admin(me) {
            return Some(UserRole::Admin);
        }
        let global = if is_creative(me) {
            UserRole::Creative
        } else if is_client(me) {
            UserRole::Client
        } else {
            return None;
        };

        match self.organization_role {
            UserRole::Admin => Some(global),
            role if role == global => Some(global),
            _ => None,
        }
    }

    /// Management rights over the organization: members and delivery plans.
    pub fn is_org_admin(&self) -> bool {
        is_admin(Some(self)) || self.organization_role == UserRole::Admin
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_org_admin() || self.permissions.iter().any(|p| p == permission)
    }

    /// Guard: the caller must work in one of `roles` here.
    pub fn require_role(&self, roles: &[UserRole], message: &str) -> AppResult<()> {
        match self.effective_role() {
            Some(role) if roles.contains(&role) => Ok(()),
            _ => Err(AppError::forbidden(message)),
        }
    }

    pub fn require_org_admin(&self, message: &str) -> AppResult<()> {
        if self.is_org_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden(message))
        }
    }
}
