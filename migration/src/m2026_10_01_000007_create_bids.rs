//! Migration to create the bids table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bids::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bids::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bids::AccountId).integer().not_null())
                    .col(ColumnDef::new(Bids::ProductId).integer().not_null())
                    .col(ColumnDef::new(Bids::Price).double().not_null())
                    .col(
                        ColumnDef::new(Bids::Status)
                            .text()
                            .not_null()
                            .default("sent"),
                    )
                    .col(
                        ColumnDef::new(Bids::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bids_account_id")
                            .from(Bids::Table, Bids::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bids_product_id")
                            .from(Bids::Table, Bids::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Bid chains are resumed per product by latest id
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_product_id")
                    .table(Bids::Table)
                    .col(Bids::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_bids_product_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Bids::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bids {
    Table,
    Id,
    AccountId,
    ProductId,
    Price,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}
