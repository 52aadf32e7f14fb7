//! Database seeding functionality
//!
//! Seeding runs as an ordered pipeline of phases (cities, accounts,
//! products, bids). Every phase works through a [`SeedContext`] that carries
//! the database handle, the random-number generator and the run's "now".

pub mod accounts;
pub mod bids;
pub mod cities;
pub mod pipeline;
pub mod products;

pub use accounts::{GenerateAccounts, generate_accounts};
pub use bids::{GenerateBids, generate_bids, generate_bids_for_product, place_bid};
pub use cities::{LoadCities, load_cities};
pub use pipeline::{PhaseReport, PipelineError, SeedPhase, SeedPipeline};
pub use products::{LoadProducts, load_products};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::faker::Faker;

/// State shared by every phase of one seeding run
pub struct SeedContext {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
    /// Single source of randomness for the run
    pub rng: StdRng,
    pub faker: Faker,
    /// Upper bound for range-mode timestamps, captured once per run
    pub now: DateTime<Utc>,
}

impl SeedContext {
    /// Creates a context whose "now" is the current time.
    ///
    /// With `rng_seed` set the run draws the same random values every time,
    /// given the same database contents and the same "now".
    pub fn new(db: Arc<DatabaseConnection>, rng_seed: Option<u64>) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            db,
            rng,
            faker: Faker::new(),
            now: Utc::now(),
        }
    }

    /// Overrides the captured "now".
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}
