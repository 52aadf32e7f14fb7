//! # Marketplace Seeder Entry Point
//!
//! Runs the standard seeding pipeline once against the configured database.

use std::sync::Arc;

use anyhow::Context;
use marketplace_seeder::{
    config::ConfigLoader,
    db,
    seeds::{SeedContext, SeedPipeline},
    telemetry,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration from layered env files and variables
    let config = ConfigLoader::new().load()?;

    telemetry::init_tracing(&config)?;

    log::info!("Loaded configuration for profile: {}", config.profile);
    for key in &config.unprefixed_keys {
        log::warn!(
            "Ignoring {} without the SEEDER_ prefix; set SEEDER_{} to use it",
            key,
            key
        );
    }
    if let Ok(redacted_json) = config.redacted_json() {
        log::debug!("Configuration: {}", redacted_json);
    }

    let conn = db::init_pool(&config).await?;
    db::health_check(&conn).await?;
    if config.run_migrations {
        db::migrate(&conn).await?;
    }

    let pipeline =
        SeedPipeline::standard(&config.seed).context("Failed to assemble seeding pipeline")?;
    let mut ctx = SeedContext::new(Arc::new(conn), config.seed.rng_seed);

    let reports = pipeline.run(&mut ctx).await.context("Seeding failed")?;
    for report in &reports {
        log::info!("{}: created {}", report.phase, report.created);
    }

    Ok(())
}
