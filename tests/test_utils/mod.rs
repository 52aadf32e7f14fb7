//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations applied, plus small fixture builders for seeded rows.

use anyhow::Result;
use chrono::{DateTime, Utc};
use marketplace_seeder::models::{account, city, product};
use marketplace_seeder::seeds::SeedContext;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;

/// Fixed seed so test runs draw the same random values.
#[allow(dead_code)]
pub const TEST_RNG_SEED: u64 = 20_220_101;

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// Foreign keys stay enforced, so fixtures must be inserted parents first.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    // Create in-memory SQLite database
    let db = Database::connect("sqlite::memory:").await?;

    // Run all migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Sets up an in-memory SQLite database and wraps it in a seeding context
/// with a fixed RNG seed.
#[allow(dead_code)]
pub async fn setup_test_context() -> Result<SeedContext> {
    let db = setup_test_db().await?;
    Ok(SeedContext::new(Arc::new(db), Some(TEST_RNG_SEED)))
}

/// Inserts a city directly for testing.
#[allow(dead_code)]
pub async fn insert_city(db: &DatabaseConnection, id: i32, name: &str) -> Result<city::Model> {
    city::Entity::insert(city::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        location: Set(city::encode_location(0.0, 0.0)),
    })
    .exec(db)
    .await?;

    city::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("city {id} missing after insert"))
}

/// Inserts an account directly for testing.
#[allow(dead_code)]
pub async fn insert_account(
    db: &DatabaseConnection,
    city_id: i32,
    created_at: DateTime<Utc>,
) -> Result<account::Model> {
    let model = account::ActiveModel {
        name: Set("Test Account".to_string()),
        phone_number: Set("555-0100".to_string()),
        address: Set("1 Test Street".to_string()),
        city_id: Set(city_id),
        created_at: Set(created_at.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

/// Inserts a product directly for testing, resolving a throwaway model.
#[allow(dead_code)]
pub async fn insert_product(
    db: &Arc<DatabaseConnection>,
    id: i32,
    seller: &account::Model,
    price: f64,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
) -> Result<product::Model> {
    let lookups = marketplace_seeder::repositories::LookupResolver::new(db.clone());
    let brand = lookups.brand("Test Brand").await?;
    let body_type = lookups.body_type("Sedan").await?;
    let model = lookups.vehicle_model("Test Model", &brand, &body_type).await?;

    product::Entity::insert(product::ActiveModel {
        id: Set(id),
        account_id: Set(seller.id),
        model_id: Set(model.id),
        city_id: Set(seller.city_id),
        year: Set(2020),
        price: Set(price),
        created_at: Set(created_at.into()),
        deleted_at: Set(deleted_at.map(Into::into)),
    })
    .exec(db.as_ref())
    .await?;

    product::Entity::find_by_id(id)
        .one(db.as_ref())
        .await?
        .ok_or_else(|| anyhow::anyhow!("product {id} missing after insert"))
}
