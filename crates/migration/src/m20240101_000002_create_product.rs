//! Create `product` table with FK to `user`.
//!
//! A tracked product: lowest observed price (`lprice`) and the owner's target (`myprice`).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(uuid(Product::Id).primary_key())
                    .col(uuid(Product::UserId).not_null())
                    .col(string_len(Product::Title, 512).not_null())
                    .col(string_len(Product::Image, 1024).not_null())
                    .col(string_len(Product::Link, 1024).not_null())
                    .col(integer(Product::Lprice).not_null())
                    .col(integer(Product::Myprice).not_null())
                    .col(timestamp_with_time_zone(Product::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Product::ModifiedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_user")
                            .from(Product::Table, Product::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product { Table, Id, UserId, Title, Image, Link, Lprice, Myprice, CreatedAt, ModifiedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
