use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::convert_all;
use super::entities::{content_draft, status_event};
use crate::domain::{ContentDraft, DraftFilter, DraftStatus, NewDraft, NewStatusEvent};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DraftRepository: Send + Sync {
    async fn create(&self, draft: NewDraft) -> AppResult<ContentDraft>;

    async fn find_in_org(&self, organization_id: Uuid, id: Uuid)
        -> AppResult<Option<ContentDraft>>;

    async fn list(
        &self,
        organization_id: Uuid,
        filter: DraftFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ContentDraft>, u64)>;

    /// Write body, content type and metadata if the stored row still has
    /// `expected_version`.
    async fn update_content(
        &self,
        draft: ContentDraft,
        expected_version: i32,
    ) -> AppResult<Option<ContentDraft>>;

    /// Compare-and-swap on (status, version), then append `event`, in one
    /// transaction. `None` when the draft changed underneath.
    async fn transition_status(
        &self,
        draft: ContentDraft,
        expected_status: DraftStatus,
        expected_version: i32,
        event: NewStatusEvent,
    ) -> AppResult<Option<ContentDraft>>;
}

pub struct DraftStore {
    db: DatabaseConnection,
}

impl DraftStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DraftRepository for DraftStore {
    async fn create(&self, new_draft: NewDraft) -> AppResult<ContentDraft> {
        let now = Utc::now();
        let model = content_draft::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(new_draft.organization_id),
            idea_id: Set(new_draft.idea_id),
            created_by: Set(new_draft.created_by),
            body: Set(new_draft.body),
            content_type: Set(new_draft.content_type.as_str().to_string()),
            status: Set(DraftStatus::Draft.as_str().to_string()),
            metadata: Set(json!({ "statusHistory": [] })),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        ContentDraft::try_from(model)
    }

    async fn find_in_org(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> AppResult<Option<ContentDraft>> {
        content_draft::Entity::find_by_id(id)
            .filter(content_draft::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .map(ContentDraft::try_from)
            .transpose()
    }

    async fn list(
        &self,
        organization_id: Uuid,
        filter: DraftFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ContentDraft>, u64)> {
        let mut query = content_draft::Entity::find()
            .filter(content_draft::Column::OrganizationId.eq(organization_id));
        if let Some(idea_id) = filter.idea_id {
            query = query.filter(content_draft::Column::IdeaId.eq(idea_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(content_draft::Column::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_desc(content_draft::Column::UpdatedAt)
            .paginate(&self.db, pagination.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(pagination.page_index()).await?;

        Ok((convert_all(models)?, total))
    }

    async fn update_content(
        &self,
        draft: ContentDraft,
        expected_version: i32,
    ) -> AppResult<Option<ContentDraft>> {
        let result = content_draft::Entity::update_many()
            .col_expr(content_draft::Column::Body, Expr::value(draft.body.clone()))
            .col_expr(
                content_draft::Column::ContentType,
                Expr::value(draft.content_type.as_str()),
            )
            .col_expr(content_draft::Column::Metadata, Expr::value(draft.metadata.clone()))
            .col_expr(content_draft::Column::Version, Expr::value(draft.version))
            .col_expr(content_draft::Column::UpdatedAt, Expr::value(draft.updated_at))
            .filter(content_draft::Column::Id.eq(draft.id))
            .filter(content_draft::Column::OrganizationId.eq(draft.organization_id))
            .filter(content_draft::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_in_org(draft.organization_id, draft.id).await
    }

    async fn transition_status(
        &self,
        draft: ContentDraft,
        expected_status: DraftStatus,
        expected_version: i32,
        event: NewStatusEvent,
    ) -> AppResult<Option<ContentDraft>> {
        let txn = self.db.begin().await?;

        let result = content_draft::Entity::update_many()
            .col_expr(content_draft::Column::Status, Expr::value(draft.status.as_str()))
            .col_expr(content_draft::Column::Metadata, Expr::value(draft.metadata.clone()))
            .col_expr(content_draft::Column::Version, Expr::value(draft.version))
            .col_expr(content_draft::Column::UpdatedAt, Expr::value(draft.updated_at))
            .filter(content_draft::Column::Id.eq(draft.id))
            .filter(content_draft::Column::OrganizationId.eq(draft.organization_id))
            .filter(content_draft::Column::Status.eq(expected_status.as_str()))
            .filter(content_draft::Column::Version.eq(expected_version))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        status_event::ActiveModel::from(event).insert(&txn).await?;
        let model = content_draft::Entity::find_by_id(draft.id).one(&txn).await?;
        txn.commit().await?;

        model.map(ContentDraft::try_from).transpose()
    }
}
