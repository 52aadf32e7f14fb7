//! Bid generation phase
//!
//! Each product has its own bid chain. A new bid continues from the latest
//! stored bid on the product (highest id) or, without one, from the product
//! itself: the price walks away from the previous price and the timestamp is
//! drawn between the previous timestamp and the run's "now".

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use sea_orm::Set;
use tracing::{debug, instrument};

use super::SeedContext;
use super::pipeline::{PhaseReport, SeedPhase};
use crate::error::SeedError;
use crate::models::{EntityKind, bid, product};
use crate::pricing::next_bid_price;
use crate::repositories::{AccountRepository, BidRepository, ProductRepository};
use crate::sequencer;

/// Places a single bid on `product` from a random account.
///
/// The bidder may be the product's own seller.
pub async fn place_bid(
    ctx: &mut SeedContext,
    product: &product::Model,
    precision: f64,
) -> Result<bid::Model, SeedError> {
    let accounts = AccountRepository::new(ctx.db.clone());
    let bids = BidRepository::new(ctx.db.clone());

    let (previous_price, previous_at) = match bids.latest_for_product(product.id).await? {
        Some(latest) => (latest.price, latest.created_at),
        None => (product.price, product.created_at),
    };

    let bidder = accounts.random(&mut ctx.rng).await?;
    let price = next_bid_price(&mut ctx.rng, previous_price, precision);
    let created_at =
        sequencer::within_range(&mut ctx.rng, previous_at.with_timezone(&Utc), ctx.now);

    bids.create(bid::ActiveModel {
        account_id: Set(bidder.id),
        product_id: Set(product.id),
        price: Set(price),
        status: Set(bid::STATUS_SENT.to_string()),
        created_at: Set(created_at.into()),
        ..Default::default()
    })
    .await
}

/// Places between 0 and `max_bids` (inclusive) bids on one product.
pub async fn generate_bids_for_product(
    ctx: &mut SeedContext,
    product: &product::Model,
    max_bids: u32,
    precision: f64,
) -> Result<Vec<bid::Model>, SeedError> {
    let count = ctx.rng.gen_range(0..=max_bids);
    let mut placed = Vec::with_capacity(count as usize);
    for _ in 0..count {
        placed.push(place_bid(ctx, product, precision).await?);
    }
    debug!(product_id = product.id, bids = placed.len(), "Placed bids");
    Ok(placed)
}

/// Generates bids for every product that is not soft-deleted.
///
/// Returns the number of bids placed.
pub async fn generate_bids(
    ctx: &mut SeedContext,
    max_bids: u32,
    precision: f64,
) -> Result<usize, SeedError> {
    let products = ProductRepository::new(ctx.db.clone()).find_active().await?;

    let mut total = 0;
    for product in &products {
        total += generate_bids_for_product(ctx, product, max_bids, precision)
            .await?
            .len();
    }
    Ok(total)
}

#[derive(Debug, Clone, Copy)]
pub struct GenerateBids {
    pub max_per_product: u32,
    /// Maximum relative price change between consecutive bids
    pub precision: f64,
}

#[async_trait]
impl SeedPhase for GenerateBids {
    fn name(&self) -> &'static str {
        "bids"
    }

    fn requires(&self) -> &'static [EntityKind] {
        &[EntityKind::Account, EntityKind::Product]
    }

    fn produces(&self) -> &'static [EntityKind] {
        &[EntityKind::Bid]
    }

    #[instrument(skip_all, fields(max_per_product = self.max_per_product, precision = self.precision))]
    async fn run(&self, ctx: &mut SeedContext) -> Result<PhaseReport, SeedError> {
        let created = generate_bids(ctx, self.max_per_product, self.precision).await?;
        Ok(PhaseReport {
            phase: self.name(),
            created,
        })
    }
}
