//! Account generation phase
//!
//! Accounts form a single timestamp chain: each `created_at` lands within a
//! bounded window after the previous account's. A run continues the chain
//! from the most recent stored account, or from the chain epoch on an empty
//! table.

use async_trait::async_trait;
use chrono::TimeDelta;
use sea_orm::Set;
use tracing::instrument;

use super::SeedContext;
use super::pipeline::{PhaseReport, SeedPhase};
use crate::error::SeedError;
use crate::models::{EntityKind, account};
use crate::repositories::{AccountRepository, CityRepository};
use crate::sequencer::TimestampChain;

/// Generates `count` accounts with fake personal data and a random city.
///
/// # Errors
///
/// Returns [`SeedError::MissingReference`] when `count > 0` and there are no
/// cities to attach accounts to.
pub async fn generate_accounts(
    ctx: &mut SeedContext,
    count: u32,
    window: TimeDelta,
) -> Result<Vec<account::Model>, SeedError> {
    let accounts = AccountRepository::new(ctx.db.clone());
    let cities = CityRepository::new(ctx.db.clone());

    let previous = accounts
        .latest()
        .await?
        .map(|latest| latest.created_at.with_timezone(&chrono::Utc));
    let mut chain = TimestampChain::resume(previous);

    let mut created = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let city = cities.random(&mut ctx.rng).await?;
        let created_at = chain.next_within_window(&mut ctx.rng, window);

        let model = accounts
            .create(account::ActiveModel {
                name: Set(ctx.faker.name(&mut ctx.rng)),
                phone_number: Set(ctx.faker.phone_number(&mut ctx.rng)),
                address: Set(ctx.faker.address(&mut ctx.rng)),
                city_id: Set(city.id),
                created_at: Set(created_at.into()),
                ..Default::default()
            })
            .await?;
        created.push(model);
    }

    Ok(created)
}

#[derive(Debug, Clone, Copy)]
pub struct GenerateAccounts {
    pub count: u32,
    /// Maximum gap between consecutive accounts
    pub window: TimeDelta,
}

#[async_trait]
impl SeedPhase for GenerateAccounts {
    fn name(&self) -> &'static str {
        "accounts"
    }

    fn requires(&self) -> &'static [EntityKind] {
        &[EntityKind::City]
    }

    fn produces(&self) -> &'static [EntityKind] {
        &[EntityKind::Account]
    }

    #[instrument(skip_all, fields(count = self.count))]
    async fn run(&self, ctx: &mut SeedContext) -> Result<PhaseReport, SeedError> {
        let created = generate_accounts(ctx, self.count, self.window).await?;
        Ok(PhaseReport {
            phase: self.name(),
            created: created.len(),
        })
    }
}
