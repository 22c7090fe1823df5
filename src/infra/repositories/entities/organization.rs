use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::{Organization, SubscriptionStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub brand_color: Option<String>,
    pub subscription_status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::organization_user::Entity")]
    Memberships,
}

impl Related<super::organization_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Organization {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Organization {
            subscription_status: parse_column(
                &model.subscription_status,
                "organizations.subscription_status",
                SubscriptionStatus::parse,
            )?,
            id: model.id,
            name: model.name,
            slug: model.slug,
            brand_color: model.brand_color,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
