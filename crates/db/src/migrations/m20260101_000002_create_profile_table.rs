//! Create profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profile::UserId).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Profile::Password).string_len(256))
                    .col(ColumnDef::new(Profile::FullName).string_len(256).not_null())
                    .col(ColumnDef::new(Profile::Phone).string_len(32))
                    .col(ColumnDef::new(Profile::Address).text())
                    .col(ColumnDef::new(Profile::City).string_len(128).not_null())
                    .col(ColumnDef::new(Profile::State).string_len(128).not_null())
                    .col(ColumnDef::new(Profile::Pincode).string_len(16))
                    .col(
                        ColumnDef::new(Profile::Role)
                            .string_len(16)
                            .not_null()
                            .default("citizen"),
                    )
                    .col(
                        ColumnDef::new(Profile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Profile::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profile::Table, Profile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: role (admin lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_role")
                    .table(Profile::Table)
                    .col(Profile::Role)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profile {
    Table,
    UserId,
    Password,
    FullName,
    Phone,
    Address,
    City,
    State,
    Pincode,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
