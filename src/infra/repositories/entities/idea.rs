use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::{Idea, IdeaStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ideas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: String,
    pub delivery_item_id: Option<Uuid>,
    pub publishing_date: Option<Date>,
    pub publishing_time: Option<Time>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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
    #[sea_orm(has_many = "super::content_draft::Entity")]
    Drafts,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::content_draft::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drafts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Idea {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Idea {
            status: parse_column(&model.status, "ideas.status", IdeaStatus::parse)?,
            id: model.id,
            organization_id: model.organization_id,
            created_by: model.created_by,
            title: model.title,
            description: model.description,
            delivery_item_id: model.delivery_item_id,
            publishing_date: model.publishing_date,
            publishing_time: model.publishing_time,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
