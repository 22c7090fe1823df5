//! Migration: append-only status audit log.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_organizations_tables::Organizations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentStatusEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentStatusEvents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentStatusEvents::OrganizationId).uuid().not_null())
                    .col(
                        ColumnDef::new(ContentStatusEvents::EntityType)
                            .string_len(8)
                            .not_null()
                            .check(Expr::col(ContentStatusEvents::EntityType).is_in(["IDEA", "DRAFT"])),
                    )
                    .col(ColumnDef::new(ContentStatusEvents::EntityId).uuid().not_null())
                    .col(ColumnDef::new(ContentStatusEvents::Status).string_len(24).not_null())
                    .col(
                        ColumnDef::new(ContentStatusEvents::PreviousStatus)
                            .string_len(24)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ContentStatusEvents::ChangedBy).uuid().not_null())
                    .col(ColumnDef::new(ContentStatusEvents::Reason).text().null())
                    .col(
                        ColumnDef::new(ContentStatusEvents::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_status_events_organization")
                            .from(ContentStatusEvents::Table, ContentStatusEvents::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_status_events_entity")
                    .table(ContentStatusEvents::Table)
                    .col(ContentStatusEvents::EntityId)
                    .col(ContentStatusEvents::ChangedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContentStatusEvents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContentStatusEvents {
    Table,
    Id,
    OrganizationId,
    EntityType,
    EntityId,
    Status,
    PreviousStatus,
    ChangedBy,
    Reason,
    ChangedAt,
}
