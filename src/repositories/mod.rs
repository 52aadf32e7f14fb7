//! # Repository Layer
//!
//! Repositories encapsulate SeaORM operations for the seeded tables. Each one
//! holds an explicit database handle; nothing here reaches for global state.

pub mod account;
pub mod bid;
pub mod city;
pub mod lookup;
pub mod product;

pub use account::AccountRepository;
pub use bid::BidRepository;
pub use city::CityRepository;
pub use lookup::{BodyTypeName, BrandName, LookupKey, LookupResolver, VehicleModelKey};
pub use product::ProductRepository;

use rand::Rng;
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, Iterable, PaginatorTrait, PrimaryKeyToColumn,
    QueryOrder, QuerySelect,
};

/// Picks a uniformly random row of `E`, or `None` when the table is empty.
///
/// The row is chosen by drawing an offset from `rng` over the rows ordered by
/// primary key, so a seeded RNG reproduces the same choices.
pub async fn random_row<E, R>(db: &DatabaseConnection, rng: &mut R) -> Result<Option<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    R: Rng + ?Sized,
{
    let total = E::find().count(db).await?;
    if total == 0 {
        return Ok(None);
    }
    let offset = rng.gen_range(0..total);

    let mut query = E::find();
    for key in E::PrimaryKey::iter() {
        query = query.order_by_asc(key.into_column());
    }
    query.offset(offset).one(db).await
}
