use sea_orm::entity::prelude::*;

use crate::domain::Media;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub draft_id: Uuid,
    pub uploaded_by: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub url: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Media {
    fn from(model: Model) -> Self {
        Media {
            id: model.id,
            organization_id: model.organization_id,
            draft_id: model.draft_id,
            uploaded_by: model.uploaded_by,
            file_name: model.file_name,
            mime_type: model.mime_type,
            size_bytes: model.size_bytes,
            url: model.url,
            created_at: model.created_at,
        }
    }
}
