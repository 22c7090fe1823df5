use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::media;
use crate::domain::{Media, NewMedia};
use crate::errors::AppResult;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn create(&self, media: NewMedia) -> AppResult<Media>;

    async fn list_for_draft(&self, organization_id: Uuid, draft_id: Uuid) -> AppResult<Vec<Media>>;
}

pub struct MediaStore {
    db: DatabaseConnection,
}

impl MediaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MediaRepository for MediaStore {
    async fn create(&self, new_media: NewMedia) -> AppResult<Media> {
        let model = media::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(new_media.organization_id),
            draft_id: Set(new_media.draft_id),
            uploaded_by: Set(new_media.uploaded_by),
            file_name: Set(new_media.file_name),
            mime_type: Set(new_media.mime_type),
            size_bytes: Set(new_media.size_bytes),
            url: Set(new_media.url),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(Media::from(model))
    }

    async fn list_for_draft(&self, organization_id: Uuid, draft_id: Uuid) -> AppResult<Vec<Media>> {
        let models = media::Entity::find()
            .filter(media::Column::OrganizationId.eq(organization_id))
            .filter(media::Column::DraftId.eq(draft_id))
            .order_by_asc(media::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Media::from).collect())
    }
}
