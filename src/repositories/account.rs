//! Account repository for database operations
//!
//! Accounts are append-only; the repository creates them, reads back the
//! most recent one to resume the timestamp chain, and picks random sellers
//! and bidders.

use rand::Rng;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};
use std::sync::Arc;

use crate::error::SeedError;
use crate::models::EntityKind;
use crate::models::account::{self, Entity as Account};

/// Repository for account database operations
#[derive(Debug, Clone)]
pub struct AccountRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Creates a new AccountRepository instance
    ///
    /// # Arguments
    ///
    /// * `db` - Database connection pool
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Inserts an account and returns the stored row with its generated id.
    ///
    /// # Arguments
    ///
    /// * `account` - Active model with every column except `id` set
    pub async fn create(&self, account: account::ActiveModel) -> Result<account::Model, SeedError> {
        Ok(account.insert(&*self.db).await?)
    }

    /// Returns the account with the highest id, if any.
    ///
    /// Generated accounts get increasing ids and increasing `created_at`, so
    /// this is where a new generation run resumes its timestamp chain.
    pub async fn latest(&self) -> Result<Option<account::Model>, SeedError> {
        Ok(Account::find()
            .order_by_desc(account::Column::Id)
            .one(&*self.db)
            .await?)
    }

    /// Lists all accounts ordered by id.
    pub async fn find_all(&self) -> Result<Vec<account::Model>, SeedError> {
        Ok(Account::find()
            .order_by_asc(account::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Picks a uniformly random account.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::MissingReference`] when the table is empty.
    pub async fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<account::Model, SeedError> {
        super::random_row::<Account, R>(&self.db, rng)
            .await?
            .ok_or(SeedError::MissingReference {
                entity: EntityKind::Account,
            })
    }
}
