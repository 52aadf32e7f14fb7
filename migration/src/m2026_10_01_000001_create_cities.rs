//! Migration to create the cities table.
//!
//! City ids come from the source spreadsheet, so the primary key is not
//! auto-incremented.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cities::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Cities::Name).text().not_null())
                    .col(ColumnDef::new(Cities::Location).text().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cities {
    Table,
    Id,
    Name,
    Location,
}
