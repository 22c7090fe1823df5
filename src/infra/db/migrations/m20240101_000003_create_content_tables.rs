//! Migration: ideas, content_drafts, feedback and media.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_organizations_tables::Organizations;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn created_at<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn organization_fk<T: IntoIden + 'static>(
    table: T,
    col: T,
    name: &str,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, col)
        .to(Organizations::Table, Organizations::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ideas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ideas::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Ideas::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Ideas::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Ideas::Title).string().not_null())
                    .col(ColumnDef::new(Ideas::Description).text().null())
                    .col(
                        ColumnDef::new(Ideas::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Ideas::DeliveryItemId).uuid().null())
                    .col(ColumnDef::new(Ideas::PublishingDate).date().null())
                    .col(ColumnDef::new(Ideas::PublishingTime).time().null())
                    .col(created_at(Ideas::CreatedAt))
                    .col(created_at(Ideas::UpdatedAt))
                    .foreign_key(&mut organization_fk(
                        Ideas::Table,
                        Ideas::OrganizationId,
                        "fk_ideas_organization",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ideas_created_by")
                            .from(Ideas::Table, Ideas::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ideas_organization_status")
                    .table(Ideas::Table)
                    .col(Ideas::OrganizationId)
                    .col(Ideas::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContentDrafts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContentDrafts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ContentDrafts::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(ContentDrafts::IdeaId).uuid().not_null())
                    .col(ColumnDef::new(ContentDrafts::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(ContentDrafts::Body).text().not_null())
                    .col(
                        ColumnDef::new(ContentDrafts::ContentType)
                            .string_len(16)
                            .not_null()
                            .default("POST"),
                    )
                    .col(
                        ColumnDef::new(ContentDrafts::Status)
                            .string_len(24)
                            .not_null()
                            .default("DRAFT"),
                    )
                    .col(
                        ColumnDef::new(ContentDrafts::Metadata)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(ContentDrafts::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(created_at(ContentDrafts::CreatedAt))
                    .col(created_at(ContentDrafts::UpdatedAt))
                    .foreign_key(&mut organization_fk(
                        ContentDrafts::Table,
                        ContentDrafts::OrganizationId,
                        "fk_content_drafts_organization",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_drafts_idea")
                            .from(ContentDrafts::Table, ContentDrafts::IdeaId)
                            .to(Ideas::Table, Ideas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_drafts_organization_idea")
                    .table(ContentDrafts::Table)
                    .col(ContentDrafts::OrganizationId)
                    .col(ContentDrafts::IdeaId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feedback::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Feedback::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Feedback::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Feedback::DraftId).uuid().null())
                    .col(ColumnDef::new(Feedback::IdeaId).uuid().null())
                    .col(ColumnDef::new(Feedback::Content).text().not_null())
                    .col(created_at(Feedback::CreatedAt))
                    // Exactly one target
                    .check(Expr::cust("(draft_id IS NULL) <> (idea_id IS NULL)"))
                    .foreign_key(&mut organization_fk(
                        Feedback::Table,
                        Feedback::OrganizationId,
                        "fk_feedback_organization",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_draft")
                            .from(Feedback::Table, Feedback::DraftId)
                            .to(ContentDrafts::Table, ContentDrafts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_idea")
                            .from(Feedback::Table, Feedback::IdeaId)
                            .to(Ideas::Table, Ideas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Media::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Media::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Media::DraftId).uuid().not_null())
                    .col(ColumnDef::new(Media::UploadedBy).uuid().not_null())
                    .col(ColumnDef::new(Media::FileName).string().not_null())
                    .col(ColumnDef::new(Media::MimeType).string().not_null())
                    .col(ColumnDef::new(Media::SizeBytes).big_integer().not_null())
                    .col(ColumnDef::new(Media::Url).text().not_null())
                    .col(created_at(Media::CreatedAt))
                    .foreign_key(&mut organization_fk(
                        Media::Table,
                        Media::OrganizationId,
                        "fk_media_organization",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_draft")
                            .from(Media::Table, Media::DraftId)
                            .to(ContentDrafts::Table, ContentDrafts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContentDrafts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ideas::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
pub enum Ideas {
    Table,
    Id,
    OrganizationId,
    CreatedBy,
    Title,
    Description,
    Status,
    DeliveryItemId,
    PublishingDate,
    PublishingTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum ContentDrafts {
    Table,
    Id,
    OrganizationId,
    IdeaId,
    CreatedBy,
    Body,
    ContentType,
    Status,
    Metadata,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy)]
enum Feedback {
    Table,
    Id,
    OrganizationId,
    AuthorId,
    DraftId,
    IdeaId,
    Content,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum Media {
    Table,
    Id,
    OrganizationId,
    DraftId,
    UploadedBy,
    FileName,
    MimeType,
    SizeBytes,
    Url,
    CreatedAt,
}
