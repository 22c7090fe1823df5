use sea_orm::{entity::prelude::*, Set};

use crate::domain::NewStatusEvent;

/// Append-only. Rows are inserted and never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "content_status_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub status: String,
    pub previous_status: String,
    pub changed_by: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    pub changed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<NewStatusEvent> for ActiveModel {
    fn from(event: NewStatusEvent) -> Self {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(event.organization_id),
            entity_type: Set(event.entity_kind.as_str().to_string()),
            entity_id: Set(event.entity_id),
            status: Set(event.status),
            previous_status: Set(event.previous_status),
            changed_by: Set(event.changed_by),
            reason: Set(event.reason),
            changed_at: Set(event.changed_at),
        }
    }
}
