//! Create `folder` table with FK to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Folder::Table)
                    .if_not_exists()
                    .col(uuid(Folder::Id).primary_key())
                    .col(uuid(Folder::UserId).not_null())
                    .col(string_len(Folder::Name, 128).not_null())
                    .col(timestamp_with_time_zone(Folder::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_folder_user")
                            .from(Folder::Table, Folder::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Folder::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Folder { Table, Id, UserId, Name, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
