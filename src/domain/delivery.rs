//! Monthly content delivery plans and their per-type quantity targets.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ContentType;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeliveryPlan {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    /// Always the first day of the month.
    pub month: NaiveDate,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeliveryItem {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub organization_id: Uuid,
    pub content_type: ContentType,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDeliveryItem {
    pub content_type: ContentType,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDeliveryPlan {
    pub organization_id: Uuid,
    pub name: String,
    pub month: NaiveDate,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub items: Vec<NewDeliveryItem>,
}

impl NewDeliveryPlan {
    /// Normalizes `month` to its first day and checks the item list.
    pub fn validated(mut self) -> AppResult<Self> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Plan name is required"));
        }
        if self.items.is_empty() {
            return Err(AppError::validation("A delivery plan needs at least one item"));
        }
        if self.items.iter().any(|item| item.quantity <= 0) {
            return Err(AppError::validation("Item quantity must be greater than zero"));
        }
        self.month = first_of_month(self.month);
        Ok(self)
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Delivery item with the number of ideas linked to it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeliveryItemProgress {
    #[serde(flatten)]
    pub item: DeliveryItem,
    pub linked_ideas: u64,
    pub remaining: i64,
}

impl DeliveryItemProgress {
    pub fn new(item: DeliveryItem, linked_ideas: u64) -> Self {
        let remaining = (i64::from(item.quantity) - linked_ideas as i64).max(0);
        Self {
            item,
            linked_ideas,
            remaining,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeliveryPlanDetail {
    #[serde(flatten)]
    pub plan: DeliveryPlan,
    pub items: Vec<DeliveryItemProgress>,
}
