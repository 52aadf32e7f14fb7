//! Body type entity model
//!
//! Stored in the `types` table (sedan, hatchback, SUV, ...).

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

/// Body type lookup entity, unique by name
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Body type name (unique, case-sensitive)
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vehicle_model::Entity")]
    Models,
}

impl Related<super::vehicle_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Models.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
