//! City repository for database operations

use rand::Rng;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;

use crate::error::SeedError;
use crate::models::EntityKind;
use crate::models::city::{self, Entity as City};

/// Repository for city database operations
#[derive(Debug, Clone)]
pub struct CityRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl CityRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Inserts a city with its externally supplied id and returns it.
    pub async fn create(&self, city: city::ActiveModel) -> Result<city::Model, SeedError> {
        let id = city
            .id
            .clone()
            .take()
            .ok_or_else(|| SeedError::NotPersisted {
                entity: EntityKind::City,
                key: "<unset id>".to_string(),
            })?;

        City::insert(city).exec(&*self.db).await?;

        City::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| SeedError::NotPersisted {
                entity: EntityKind::City,
                key: id.to_string(),
            })
    }

    /// Picks a uniformly random city.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::MissingReference`] when no city has been loaded.
    pub async fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<city::Model, SeedError> {
        super::random_row::<City, R>(&self.db, rng)
            .await?
            .ok_or(SeedError::MissingReference {
                entity: EntityKind::City,
            })
    }
}
