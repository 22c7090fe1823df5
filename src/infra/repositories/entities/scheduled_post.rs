use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::{Platform, ScheduleStatus, ScheduledPost};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scheduled_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub draft_id: Uuid,
    pub platform: String,
    pub scheduled_for: DateTimeUtc,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ScheduledPost {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(ScheduledPost {
            platform: parse_column(&model.platform, "scheduled_posts.platform", Platform::parse)?,
            status: parse_column(&model.status, "scheduled_posts.status", ScheduleStatus::parse)?,
            id: model.id,
            organization_id: model.organization_id,
            draft_id: model.draft_id,
            scheduled_for: model.scheduled_for,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
