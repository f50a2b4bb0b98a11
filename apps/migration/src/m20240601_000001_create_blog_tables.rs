//! Themes, posts and users.
//!
//! Title and description searches rely on `LOWER()`, which folds non-ASCII
//! letters (`Ç` -> `ç`) only when the database has a UTF-8 `LC_CTYPE`
//! (e.g. `CREATE DATABASE blog ENCODING 'UTF8' LC_CTYPE 'pt_BR.UTF-8'`).
//! Under the `C` locale only ASCII is lowercased.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Theme::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Theme::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Theme::Description).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Post::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Post::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Post::Text).string_len(1000).not_null())
                    .col(
                        ColumnDef::new(Post::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Post::ThemeId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_postagens_tema")
                            .from(Post::Table, Post::ThemeId)
                            .to(Theme::Table, Theme::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_postagens_theme_id")
                    .table(Post::Table)
                    .col(Post::ThemeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(User::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(User::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::PasswordHash).string().not_null())
                    .col(ColumnDef::new(User::Photo).string_len(5000).null())
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(User::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Post::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Theme::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Theme {
    #[sea_orm(iden = "tb_tema")]
    Table,
    Id,
    Description,
}

#[derive(DeriveIden)]
enum Post {
    #[sea_orm(iden = "tb_postagens")]
    Table,
    Id,
    Title,
    Text,
    Date,
    ThemeId,
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "tb_usuarios")]
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Photo,
    CreatedAt,
    UpdatedAt,
}
