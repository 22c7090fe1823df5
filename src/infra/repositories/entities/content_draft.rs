use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::{ContentDraft, ContentType, DraftStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "content_drafts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub idea_id: Uuid,
    pub created_by: Uuid,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub content_type: String,
    pub status: String,
    pub metadata: Json,
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::idea::Entity",
        from = "Column::IdeaId",
        to = "super::idea::Column::Id",
        on_delete = "Cascade"
    )]
    Idea,
}

impl Related<super::idea::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Idea.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ContentDraft {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(ContentDraft {
            content_type: parse_column(
                &model.content_type,
                "content_drafts.content_type",
                ContentType::parse,
            )?,
            status: parse_column(&model.status, "content_drafts.status", DraftStatus::parse)?,
            id: model.id,
            organization_id: model.organization_id,
            idea_id: model.idea_id,
            created_by: model.created_by,
            body: model.body,
            metadata: model.metadata,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
