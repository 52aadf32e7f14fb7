//! Vehicle model entity model
//!
//! Stored in the `models` table. A vehicle model is unique by the triple
//! (name, brand, body type); the same name may exist under several brands.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

/// Vehicle model lookup entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "models")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Model name, e.g. "Avanza"
    pub name: String,

    /// Owning brand
    pub brand_id: i32,

    /// Body type of this model
    pub type_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "super::body_type::Entity",
        from = "Column::TypeId",
        to = "super::body_type::Column::Id"
    )]
    BodyType,
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::body_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BodyType.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
