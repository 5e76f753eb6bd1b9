use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Product: owner listings
        manager
            .create_index(
                Index::create()
                    .name("idx_product_user")
                    .table(Product::Table)
                    .col(Product::UserId)
                    .to_owned(),
            )
            .await?;

        // Folder: composite unique (user_id, name)
        manager
            .create_index(
                Index::create()
                    .name("uniq_folder_user_name")
                    .table(Folder::Table)
                    .col(Folder::UserId)
                    .col(Folder::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ProductFolder: folder membership lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_product_folder_folder")
                    .table(ProductFolder::Table)
                    .col(ProductFolder::FolderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_user").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_folder_user_name").table(Folder::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_folder_folder").table(ProductFolder::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Product { Table, UserId }

#[derive(DeriveIden)]
enum Folder { Table, UserId, Name }

#[derive(DeriveIden)]
enum ProductFolder { Table, FolderId }
