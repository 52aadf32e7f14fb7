//! Migration to create the vehicle models lookup table.
//!
//! A model is identified by its name together with its brand and body type,
//! enforced through a composite unique index.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Models::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Models::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Models::Name).text().not_null())
                    .col(ColumnDef::new(Models::BrandId).integer().not_null())
                    .col(ColumnDef::new(Models::TypeId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_models_brand_id")
                            .from(Models::Table, Models::BrandId)
                            .to(Brands::Table, Brands::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_models_type_id")
                            .from(Models::Table, Models::TypeId)
                            .to(Types::Table, Types::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_models_name_brand_type")
                    .table(Models::Table)
                    .col(Models::Name)
                    .col(Models::BrandId)
                    .col(Models::TypeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_models_name_brand_type").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Models::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Models {
    Table,
    Id,
    Name,
    BrandId,
    TypeId,
}

#[derive(DeriveIden)]
enum Brands {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Types {
    Table,
    Id,
}
