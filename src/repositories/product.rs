//! Product repository for database operations

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;

use crate::error::SeedError;
use crate::models::EntityKind;
use crate::models::product::{self, Entity as Product};

/// Repository for product database operations
#[derive(Debug, Clone)]
pub struct ProductRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl ProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Inserts a product with its externally supplied id and returns it.
    pub async fn create(&self, product: product::ActiveModel) -> Result<product::Model, SeedError> {
        let id = product
            .id
            .clone()
            .take()
            .ok_or_else(|| SeedError::NotPersisted {
                entity: EntityKind::Product,
                key: "<unset id>".to_string(),
            })?;

        Product::insert(product).exec(&*self.db).await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| SeedError::NotPersisted {
                entity: EntityKind::Product,
                key: id.to_string(),
            })
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<product::Model>, SeedError> {
        Ok(Product::find_by_id(id).one(&*self.db).await?)
    }

    /// Lists products that are not soft-deleted, ordered by id.
    pub async fn find_active(&self) -> Result<Vec<product::Model>, SeedError> {
        Ok(Product::find()
            .filter(product::Column::DeletedAt.is_null())
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await?)
    }
}
