//! # Data Models
//!
//! SeaORM entities for the marketplace tables populated by the seeder.

use std::fmt;

pub mod account;
pub mod bid;
pub mod body_type;
pub mod brand;
pub mod city;
pub mod product;
pub mod vehicle_model;

pub use account::Entity as Account;
pub use bid::Entity as Bid;
pub use body_type::Entity as BodyType;
pub use brand::Entity as Brand;
pub use city::Entity as City;
pub use product::Entity as Product;
pub use vehicle_model::Entity as VehicleModel;

/// Kinds of rows the seeder writes, used to declare phase dependencies and
/// to name missing reference data in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    City,
    Account,
    Brand,
    BodyType,
    VehicleModel,
    Product,
    Bid,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::City => "city",
            EntityKind::Account => "account",
            EntityKind::Brand => "brand",
            EntityKind::BodyType => "body type",
            EntityKind::VehicleModel => "model",
            EntityKind::Product => "product",
            EntityKind::Bid => "bid",
        };
        f.write_str(label)
    }
}
