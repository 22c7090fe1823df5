use sea_orm::entity::prelude::*;

use crate::domain::Feedback;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub author_id: Uuid,
    pub draft_id: Option<Uuid>,
    pub idea_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Feedback {
    fn from(model: Model) -> Self {
        Feedback {
            id: model.id,
            organization_id: model.organization_id,
            author_id: model.author_id,
            draft_id: model.draft_id,
            idea_id: model.idea_id,
            content: model.content,
            created_at: model.created_at,
        }
    }
}
