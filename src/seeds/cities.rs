//! City loading phase

use async_trait::async_trait;
use sea_orm::Set;
use std::path::PathBuf;
use tracing::instrument;

use super::SeedContext;
use super::pipeline::{PhaseReport, SeedPhase};
use crate::error::SeedError;
use crate::models::EntityKind;
use crate::models::city;
use crate::repositories::CityRepository;
use crate::sheets::{self, CityRow};

/// Inserts one city per row, in file order.
///
/// Each row is committed on its own, so a failing row leaves the rows before
/// it in place.
pub async fn load_cities(
    ctx: &mut SeedContext,
    rows: &[CityRow],
) -> Result<Vec<city::Model>, SeedError> {
    let repo = CityRepository::new(ctx.db.clone());
    let mut created = Vec::with_capacity(rows.len());

    for row in rows {
        let model = repo
            .create(city::ActiveModel {
                id: Set(row.id),
                name: Set(row.name.clone()),
                location: Set(city::encode_location(row.latitude, row.longitude)),
            })
            .await?;
        created.push(model);
    }

    Ok(created)
}

/// Reads the city sheet and loads every row.
#[derive(Debug, Clone)]
pub struct LoadCities {
    pub path: PathBuf,
    pub sheet: String,
}

#[async_trait]
impl SeedPhase for LoadCities {
    fn name(&self) -> &'static str {
        "cities"
    }

    fn requires(&self) -> &'static [EntityKind] {
        &[]
    }

    fn produces(&self) -> &'static [EntityKind] {
        &[EntityKind::City]
    }

    #[instrument(skip_all, fields(path = %self.path.display(), sheet = %self.sheet))]
    async fn run(&self, ctx: &mut SeedContext) -> Result<PhaseReport, SeedError> {
        let rows = sheets::read_city_rows(&self.path, &self.sheet)?;
        log::info!("Read {} city rows", rows.len());

        let created = load_cities(ctx, &rows).await?;
        Ok(PhaseReport {
            phase: self.name(),
            created: created.len(),
        })
    }
}
