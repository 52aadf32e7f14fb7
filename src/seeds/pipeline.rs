//! Seeding pipeline
//!
//! A pipeline is an ordered list of phases. Each phase declares the entity
//! kinds it reads and the kinds it writes; building a pipeline fails when a
//! phase needs a kind that no earlier phase produces.

use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{info, instrument};

use super::SeedContext;
use super::accounts::GenerateAccounts;
use super::bids::GenerateBids;
use super::cities::LoadCities;
use super::products::LoadProducts;
use crate::config::SeedConfig;
use crate::error::SeedError;
use crate::models::EntityKind;

/// Errors raised while assembling a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("pipeline has no phases")]
    Empty,
    #[error("phase '{phase}' requires {entity} rows but no earlier phase produces them")]
    UnsatisfiedRequirement {
        phase: &'static str,
        entity: EntityKind,
    },
}

/// Outcome of one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: &'static str,
    /// Rows of the phase's primary entity written by this run
    pub created: usize,
}

/// One step of a seeding run.
#[async_trait]
pub trait SeedPhase: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Entity kinds that must exist before the phase runs.
    fn requires(&self) -> &'static [EntityKind];

    /// Entity kinds the phase writes.
    fn produces(&self) -> &'static [EntityKind];

    async fn run(&self, ctx: &mut SeedContext) -> Result<PhaseReport, SeedError>;
}

/// Ordered, validated list of phases
pub struct SeedPipeline {
    phases: Vec<Box<dyn SeedPhase>>,
}

impl std::fmt::Debug for SeedPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.phases.iter().map(|phase| phase.name()))
            .finish()
    }
}

impl SeedPipeline {
    /// Builds a pipeline, checking that every requirement is produced by an
    /// earlier phase.
    pub fn new(phases: Vec<Box<dyn SeedPhase>>) -> Result<Self, PipelineError> {
        if phases.is_empty() {
            return Err(PipelineError::Empty);
        }

        let mut available = BTreeSet::new();
        for phase in &phases {
            if let Some(missing) = phase
                .requires()
                .iter()
                .find(|kind| !available.contains(*kind))
            {
                return Err(PipelineError::UnsatisfiedRequirement {
                    phase: phase.name(),
                    entity: *missing,
                });
            }
            available.extend(phase.produces().iter().copied());
        }

        Ok(Self { phases })
    }

    /// The standard run: cities, accounts, products, then bids.
    pub fn standard(config: &SeedConfig) -> Result<Self, PipelineError> {
        Self::new(vec![
            Box::new(LoadCities {
                path: config.city_file.clone(),
                sheet: config.city_sheet.clone(),
            }),
            Box::new(GenerateAccounts {
                count: config.account_count,
                window: config.account_window(),
            }),
            Box::new(LoadProducts {
                path: config.product_file.clone(),
                sheet: config.product_sheet.clone(),
            }),
            Box::new(GenerateBids {
                max_per_product: config.bid_max_per_product,
                precision: config.bid_price_precision,
            }),
        ])
    }

    /// Phase names in execution order.
    pub fn phase_names(&self) -> Vec<&'static str> {
        self.phases.iter().map(|phase| phase.name()).collect()
    }

    /// Runs every phase in order, stopping at the first failure.
    #[instrument(skip_all, fields(phases = self.phases.len()))]
    pub async fn run(&self, ctx: &mut SeedContext) -> Result<Vec<PhaseReport>, SeedError> {
        let mut reports = Vec::with_capacity(self.phases.len());
        for phase in &self.phases {
            info!(phase = phase.name(), "Starting seed phase");
            let report = phase.run(ctx).await?;
            info!(
                phase = report.phase,
                created = report.created,
                "Finished seed phase"
            );
            reports.push(report);
        }
        Ok(reports)
    }
}
