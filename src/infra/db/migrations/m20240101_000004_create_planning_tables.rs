//! Migration: delivery plans, delivery items and scheduled posts.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_organizations_tables::Organizations;
use super::m20240101_000003_create_content_tables::{ContentDrafts, Ideas};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentDeliveryPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentDeliveryPlans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentDeliveryPlans::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(ContentDeliveryPlans::Name).string().not_null())
                    .col(ColumnDef::new(ContentDeliveryPlans::Month).date().not_null())
                    .col(ColumnDef::new(ContentDeliveryPlans::Description).text().null())
                    .col(ColumnDef::new(ContentDeliveryPlans::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(ContentDeliveryPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_plans_organization")
                            .from(ContentDeliveryPlans::Table, ContentDeliveryPlans::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContentDeliveryItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentDeliveryItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentDeliveryItems::PlanId).uuid().not_null())
                    .col(ColumnDef::new(ContentDeliveryItems::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(ContentDeliveryItems::ContentType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(ContentDeliveryItems::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(ContentDeliveryItems::Quantity).gt(0)),
                    )
                    .col(ColumnDef::new(ContentDeliveryItems::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_items_plan")
                            .from(ContentDeliveryItems::Table, ContentDeliveryItems::PlanId)
                            .to(ContentDeliveryPlans::Table, ContentDeliveryPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_ideas_delivery_item")
                    .from(Ideas::Table, Ideas::DeliveryItemId)
                    .to(ContentDeliveryItems::Table, ContentDeliveryItems::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ScheduledPosts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ScheduledPosts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ScheduledPosts::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(ScheduledPosts::DraftId).uuid().not_null())
                    .col(
                        ColumnDef::new(ScheduledPosts::Platform)
                            .string_len(16)
                            .not_null()
                            .default("LINKEDIN"),
                    )
                    .col(
                        ColumnDef::new(ScheduledPosts::ScheduledFor)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledPosts::Status)
                            .string_len(16)
                            .not_null()
                            .default("SCHEDULED"),
                    )
                    .col(ColumnDef::new(ScheduledPosts::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(ScheduledPosts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScheduledPosts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scheduled_posts_organization")
                            .from(ScheduledPosts::Table, ScheduledPosts::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scheduled_posts_draft")
                            .from(ScheduledPosts::Table, ScheduledPosts::DraftId)
                            .to(ContentDrafts::Table, ContentDrafts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scheduled_posts_organization_for")
                    .table(ScheduledPosts::Table)
                    .col(ScheduledPosts::OrganizationId)
                    .col(ScheduledPosts::ScheduledFor)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduledPosts::Table).to_owned())
            .await?;
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name("fk_ideas_delivery_item")
                    .table(Ideas::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ContentDeliveryItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContentDeliveryPlans::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContentDeliveryPlans {
    Table,
    Id,
    OrganizationId,
    Name,
    Month,
    Description,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum ContentDeliveryItems {
    Table,
    Id,
    PlanId,
    OrganizationId,
    ContentType,
    Quantity,
    Notes,
}

#[derive(Iden)]
enum ScheduledPosts {
    Table,
    Id,
    OrganizationId,
    DraftId,
    Platform,
    ScheduledFor,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
