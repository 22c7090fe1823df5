use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::{Membership, UserRole};
use crate::errors::AppError;

/// OrganizationUser. Unique on (organization_id, user_id).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "organization_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub is_active: bool,
    /// JSON array of permission names.
    pub permissions: Json,
    pub joined_at: DateTimeUtc,
    pub invited_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_delete = "Cascade"
    )]
    Organization,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Non-string entries are ignored.
pub(crate) fn permissions_from_json(value: &Json) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

impl TryFrom<Model> for Membership {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Membership {
            role: parse_column(&model.role, "organization_users.role", UserRole::parse)?,
            permissions: permissions_from_json(&model.permissions),
            id: model.id,
            organization_id: model.organization_id,
            user_id: model.user_id,
            is_active: model.is_active,
            joined_at: model.joined_at,
            invited_at: model.invited_at,
        })
    }
}
