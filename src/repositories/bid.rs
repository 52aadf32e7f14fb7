//! Bid repository for database operations

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;

use crate::error::SeedError;
use crate::models::bid::{self, Entity as Bid};

/// Repository for bid database operations
#[derive(Debug, Clone)]
pub struct BidRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl BidRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Inserts a bid and returns the stored row with its generated id.
    pub async fn create(&self, bid: bid::ActiveModel) -> Result<bid::Model, SeedError> {
        Ok(bid.insert(&*self.db).await?)
    }

    /// Returns the most recent bid (highest id) placed on `product_id`.
    pub async fn latest_for_product(&self, product_id: i32) -> Result<Option<bid::Model>, SeedError> {
        Ok(Bid::find()
            .filter(bid::Column::ProductId.eq(product_id))
            .order_by_desc(bid::Column::Id)
            .one(&*self.db)
            .await?)
    }

    /// Lists the bids on `product_id` in insertion order.
    pub async fn find_by_product(&self, product_id: i32) -> Result<Vec<bid::Model>, SeedError> {
        Ok(Bid::find()
            .filter(bid::Column::ProductId.eq(product_id))
            .order_by_asc(bid::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Lists every bid ordered by id.
    pub async fn find_all(&self) -> Result<Vec<bid::Model>, SeedError> {
        Ok(Bid::find()
            .order_by_asc(bid::Column::Id)
            .all(&*self.db)
            .await?)
    }
}
