//! Database migrations for the marketplace seeder.
//!
//! This module contains the schema for the seeded marketplace tables using
//! SeaORM Migration. Tables are created parents-first so foreign keys resolve.

pub use sea_orm_migration::prelude::*;

mod m2026_10_01_000001_create_cities;
mod m2026_10_01_000002_create_accounts;
mod m2026_10_01_000003_create_brands;
mod m2026_10_01_000004_create_types;
mod m2026_10_01_000005_create_models;
mod m2026_10_01_000006_create_products;
mod m2026_10_01_000007_create_bids;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2026_10_01_000001_create_cities::Migration),
            Box::new(m2026_10_01_000002_create_accounts::Migration),
            Box::new(m2026_10_01_000003_create_brands::Migration),
            Box::new(m2026_10_01_000004_create_types::Migration),
            Box::new(m2026_10_01_000005_create_models::Migration),
            Box::new(m2026_10_01_000006_create_products::Migration),
            Box::new(m2026_10_01_000007_create_bids::Migration),
        ]
    }
}
