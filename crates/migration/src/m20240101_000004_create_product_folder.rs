//! Create `product_folder` association table.
//! Links one product to one folder; the pair is unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductFolder::Table)
                    .if_not_exists()
                    .col(uuid(ProductFolder::Id).primary_key())
                    .col(uuid(ProductFolder::ProductId).not_null())
                    .col(uuid(ProductFolder::FolderId).not_null())
                    .col(timestamp_with_time_zone(ProductFolder::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_folder_product")
                            .from(ProductFolder::Table, ProductFolder::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_folder_folder")
                            .from(ProductFolder::Table, ProductFolder::FolderId)
                            .to(Folder::Table, Folder::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite unique index: one link per (product, folder)
        manager
            .create_index(
                Index::create()
                    .name("uniq_product_folder_pair")
                    .table(ProductFolder::Table)
                    .col(ProductFolder::ProductId)
                    .col(ProductFolder::FolderId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProductFolder::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProductFolder { Table, Id, ProductId, FolderId, CreatedAt }

#[derive(DeriveIden)]
enum Product { Table, Id }

#[derive(DeriveIden)]
enum Folder { Table, Id }
