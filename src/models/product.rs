//! Product entity model
//!
//! Products are vehicle listings imported from the product spreadsheet and
//! attached to a random seller account and city.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Product entity representing a listing
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Identifier taken from the source file (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    /// Seller account
    pub account_id: i32,

    /// Vehicle model being sold
    pub model_id: i32,

    /// City the listing is located in
    pub city_id: i32,

    /// Production year
    pub year: i32,

    /// Listed price
    pub price: f64,

    /// Listing timestamp; never earlier than the seller's `created_at`
    pub created_at: DateTimeWithTimeZone,

    /// Soft-delete marker; deleted listings receive no bids
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::vehicle_model::Entity",
        from = "Column::ModelId",
        to = "super::vehicle_model::Column::Id"
    )]
    VehicleModel,
    #[sea_orm(
        belongs_to = "super::city::Entity",
        from = "Column::CityId",
        to = "super::city::Column::Id"
    )]
    City,
    #[sea_orm(has_many = "super::bid::Entity")]
    Bids,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::vehicle_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleModel.def()
    }
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl Related<super::bid::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
