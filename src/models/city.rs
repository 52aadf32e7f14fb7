//! City entity model
//!
//! Cities are imported verbatim from the city spreadsheet, including their id.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

/// City entity with its coordinates encoded as `"(lat,lon)"` text
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    /// Identifier taken from the source file (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    /// City name
    pub name: String,

    /// Latitude/longitude pair, e.g. `(-6.2,106.816666)`
    pub location: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account::Entity")]
    Accounts,
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Encodes a coordinate pair the way the `location` column stores it.
///
/// Whole-number coordinates keep their trailing `.0`, so `(1.0, 2.0)` encodes
/// as `"(1.0,2.0)"`.
pub fn encode_location(latitude: f64, longitude: f64) -> String {
    format!("({:?},{:?})", latitude, longitude)
}
