//! Lookup resolution for brands, body types and vehicle models.
//!
//! Lookup rows are deduplicated by their natural key. Resolution is a single
//! `INSERT ... ON CONFLICT (natural key) DO NOTHING` followed by a read of the
//! row carrying that key, so two seeders racing on the same key both end up
//! with the one row the unique index admitted.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use std::sync::Arc;

use crate::error::SeedError;
use crate::models::EntityKind;
use crate::models::{body_type, brand, vehicle_model};

/// Natural key of a lookup entity.
///
/// The conflict columns must be covered by a unique index so the database
/// can arbitrate concurrent inserts.
pub trait LookupKey {
    type Entity: EntityTrait;

    /// Kind reported in logs and errors.
    const KIND: EntityKind;

    /// Columns of the unique index backing this key.
    fn conflict_columns() -> Vec<<Self::Entity as EntityTrait>::Column>;

    /// Row to insert when the key is absent.
    fn active_model(&self) -> <Self::Entity as EntityTrait>::ActiveModel;

    /// Exact, case-sensitive match on every key column.
    fn condition(&self) -> Condition;

    fn describe(&self) -> String;
}

/// Brand natural key: its name
#[derive(Debug, Clone, Copy)]
pub struct BrandName<'a>(pub &'a str);

/// Body type natural key: its name
#[derive(Debug, Clone, Copy)]
pub struct BodyTypeName<'a>(pub &'a str);

/// Vehicle model natural key: name within a brand and body type
#[derive(Debug, Clone, Copy)]
pub struct VehicleModelKey<'a> {
    pub name: &'a str,
    pub brand_id: i32,
    pub type_id: i32,
}

impl LookupKey for BrandName<'_> {
    type Entity = brand::Entity;
    const KIND: EntityKind = EntityKind::Brand;

    fn conflict_columns() -> Vec<brand::Column> {
        vec![brand::Column::Name]
    }

    fn active_model(&self) -> brand::ActiveModel {
        brand::ActiveModel {
            name: Set(self.0.to_string()),
            ..Default::default()
        }
    }

    fn condition(&self) -> Condition {
        Condition::all().add(brand::Column::Name.eq(self.0))
    }

    fn describe(&self) -> String {
        self.0.to_string()
    }
}

impl LookupKey for BodyTypeName<'_> {
    type Entity = body_type::Entity;
    const KIND: EntityKind = EntityKind::BodyType;

    fn conflict_columns() -> Vec<body_type::Column> {
        vec![body_type::Column::Name]
    }

    fn active_model(&self) -> body_type::ActiveModel {
        body_type::ActiveModel {
            name: Set(self.0.to_string()),
            ..Default::default()
        }
    }

    fn condition(&self) -> Condition {
        Condition::all().add(body_type::Column::Name.eq(self.0))
    }

    fn describe(&self) -> String {
        self.0.to_string()
    }
}

impl LookupKey for VehicleModelKey<'_> {
    type Entity = vehicle_model::Entity;
    const KIND: EntityKind = EntityKind::VehicleModel;

    fn conflict_columns() -> Vec<vehicle_model::Column> {
        vec![
            vehicle_model::Column::Name,
            vehicle_model::Column::BrandId,
            vehicle_model::Column::TypeId,
        ]
    }

    fn active_model(&self) -> vehicle_model::ActiveModel {
        vehicle_model::ActiveModel {
            name: Set(self.name.to_string()),
            brand_id: Set(self.brand_id),
            type_id: Set(self.type_id),
            ..Default::default()
        }
    }

    fn condition(&self) -> Condition {
        Condition::all()
            .add(vehicle_model::Column::Name.eq(self.name))
            .add(vehicle_model::Column::BrandId.eq(self.brand_id))
            .add(vehicle_model::Column::TypeId.eq(self.type_id))
    }

    fn describe(&self) -> String {
        format!(
            "{} (brand {}, type {})",
            self.name, self.brand_id, self.type_id
        )
    }
}

/// Get-or-create resolver for lookup tables
#[derive(Debug, Clone)]
pub struct LookupResolver {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl LookupResolver {
    /// Creates a new LookupResolver instance
    ///
    /// # Arguments
    ///
    /// * `db` - Database connection pool
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Returns the row matching `key`, creating it first if it does not exist.
    ///
    /// Repeated calls with the same key return the same row. A newly created
    /// row is committed before this returns.
    ///
    /// # Arguments
    ///
    /// * `key` - Natural key of the brand, body type or vehicle model
    ///
    /// # Returns
    ///
    /// Returns the stored lookup row
    pub async fn resolve_or_create<K>(
        &self,
        key: &K,
    ) -> Result<<K::Entity as EntityTrait>::Model, SeedError>
    where
        K: LookupKey,
        <K::Entity as EntityTrait>::ActiveModel: Send + 'static,
        <K::Entity as EntityTrait>::Model:
            IntoActiveModel<<K::Entity as EntityTrait>::ActiveModel>,
    {
        let inserted = <K::Entity as EntityTrait>::insert(key.active_model())
            .on_conflict(
                OnConflict::columns(K::conflict_columns())
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        let resolved = <K::Entity as EntityTrait>::find()
            .filter(key.condition())
            .one(&*self.db)
            .await?
            .ok_or_else(|| SeedError::NotPersisted {
                entity: K::KIND,
                key: key.describe(),
            })?;

        if inserted > 0 {
            log::debug!("Created {} '{}'", K::KIND, key.describe());
        }

        Ok(resolved)
    }

    /// Resolves a brand by name.
    pub async fn brand(&self, name: &str) -> Result<brand::Model, SeedError> {
        self.resolve_or_create(&BrandName(name)).await
    }

    /// Resolves a body type by name.
    pub async fn body_type(&self, name: &str) -> Result<body_type::Model, SeedError> {
        self.resolve_or_create(&BodyTypeName(name)).await
    }

    /// Resolves a vehicle model by name within `brand` and `body_type`.
    pub async fn vehicle_model(
        &self,
        name: &str,
        brand: &brand::Model,
        body_type: &body_type::Model,
    ) -> Result<vehicle_model::Model, SeedError> {
        self.resolve_or_create(&VehicleModelKey {
            name,
            brand_id: brand.id,
            type_id: body_type.id,
        })
        .await
    }
}
