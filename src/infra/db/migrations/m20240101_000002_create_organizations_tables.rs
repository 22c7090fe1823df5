//! Migration: organizations and organization_users.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Organizations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Organizations::Name).string().not_null())
                    .col(ColumnDef::new(Organizations::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Organizations::BrandColor).string_len(7).null())
                    .col(
                        ColumnDef::new(Organizations::SubscriptionStatus)
                            .string_len(16)
                            .not_null()
                            .default("TRIAL"),
                    )
                    .col(
                        ColumnDef::new(Organizations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Organizations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrganizationUsers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrganizationUsers::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(OrganizationUsers::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(OrganizationUsers::Role)
                            .string_len(16)
                            .not_null()
                            .check(
                                Expr::col(OrganizationUsers::Role)
                                    .is_in(["ADMIN", "CREATIVE", "CLIENT"]),
                            ),
                    )
                    .col(
                        ColumnDef::new(OrganizationUsers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(OrganizationUsers::Permissions)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(OrganizationUsers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(OrganizationUsers::InvitedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organization_users_organization")
                            .from(OrganizationUsers::Table, OrganizationUsers::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organization_users_user")
                            .from(OrganizationUsers::Table, OrganizationUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_organization_users_org_user")
                    .table(OrganizationUsers::Table)
                    .col(OrganizationUsers::OrganizationId)
                    .col(OrganizationUsers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Context resolution: active memberships of a user, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_organization_users_user_active_joined")
                    .table(OrganizationUsers::Table)
                    .col(OrganizationUsers::UserId)
                    .col(OrganizationUsers::IsActive)
                    .col(OrganizationUsers::JoinedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganizationUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Organizations {
    Table,
    Id,
    Name,
    Slug,
    BrandColor,
    SubscriptionStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum OrganizationUsers {
    Table,
    Id,
    OrganizationId,
    UserId,
    Role,
    IsActive,
    Permissions,
    JoinedAt,
    InvitedAt,
}
