//! Migration to create the products table.
//!
//! Product ids come from the source spreadsheet. `deleted_at` marks a
//! soft-deleted listing.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::AccountId).integer().not_null())
                    .col(ColumnDef::new(Products::ModelId).integer().not_null())
                    .col(ColumnDef::new(Products::CityId).integer().not_null())
                    .col(ColumnDef::new(Products::Year).integer().not_null())
                    .col(ColumnDef::new(Products::Price).double().not_null())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Products::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_account_id")
                            .from(Products::Table, Products::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_model_id")
                            .from(Products::Table, Products::ModelId)
                            .to(Models::Table, Models::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_city_id")
                            .from(Products::Table, Products::CityId)
                            .to(Cities::Table, Cities::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    AccountId,
    ModelId,
    CityId,
    Year,
    Price,
    CreatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Models {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Cities {
    Table,
    Id,
}
