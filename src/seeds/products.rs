//! Product loading phase

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::Set;
use std::path::PathBuf;
use tracing::instrument;

use super::SeedContext;
use super::pipeline::{PhaseReport, SeedPhase};
use crate::error::SeedError;
use crate::models::{EntityKind, product};
use crate::repositories::{AccountRepository, CityRepository, LookupResolver, ProductRepository};
use crate::sequencer;
use crate::sheets::{self, ProductRow};

/// Inserts one product per row, in file order.
///
/// Every product gets a random seller and a random city, and its brand, body
/// type and model are resolved (or created) by name. `created_at` falls
/// between the seller's `created_at` and the run's "now".
pub async fn load_products(
    ctx: &mut SeedContext,
    rows: &[ProductRow],
) -> Result<Vec<product::Model>, SeedError> {
    let accounts = AccountRepository::new(ctx.db.clone());
    let cities = CityRepository::new(ctx.db.clone());
    let products = ProductRepository::new(ctx.db.clone());
    let lookups = LookupResolver::new(ctx.db.clone());

    let mut created = Vec::with_capacity(rows.len());
    for row in rows {
        let seller = accounts.random(&mut ctx.rng).await?;
        let city = cities.random(&mut ctx.rng).await?;

        let brand = lookups.brand(&row.brand).await?;
        let body_type = lookups.body_type(&row.body_type).await?;
        let model = lookups.vehicle_model(&row.model, &brand, &body_type).await?;

        let listed_at = sequencer::within_range(
            &mut ctx.rng,
            seller.created_at.with_timezone(&Utc),
            ctx.now,
        );

        let stored = products
            .create(product::ActiveModel {
                id: Set(row.id),
                account_id: Set(seller.id),
                model_id: Set(model.id),
                city_id: Set(city.id),
                year: Set(row.year),
                price: Set(row.price),
                created_at: Set(listed_at.into()),
                deleted_at: Set(None),
            })
            .await?;
        created.push(stored);
    }

    Ok(created)
}

/// Reads the product sheet and loads every row.
#[derive(Debug, Clone)]
pub struct LoadProducts {
    pub path: PathBuf,
    pub sheet: String,
}

#[async_trait]
impl SeedPhase for LoadProducts {
    fn name(&self) -> &'static str {
        "products"
    }

    fn requires(&self) -> &'static [EntityKind] {
        &[EntityKind::City, EntityKind::Account]
    }

    fn produces(&self) -> &'static [EntityKind] {
        &[
            EntityKind::Brand,
            EntityKind::BodyType,
            EntityKind::VehicleModel,
            EntityKind::Product,
        ]
    }

    #[instrument(skip_all, fields(path = %self.path.display(), sheet = %self.sheet))]
    async fn run(&self, ctx: &mut SeedContext) -> Result<PhaseReport, SeedError> {
        let rows = sheets::read_product_rows(&self.path, &self.sheet)?;
        log::info!("Read {} product rows", rows.len());

        let created = load_products(ctx, &rows).await?;
        Ok(PhaseReport {
            phase: self.name(),
            created: created.len(),
        })
    }
}
