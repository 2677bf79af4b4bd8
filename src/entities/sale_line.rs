//! Sale line entity - One title/quantity pair of a recorded sale.
//!
//! `position` preserves the order the lines had in the cart so the titles and
//! quantities of a sale can be rebuilt as index-aligned arrays.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale line database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sale_lines")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the sale this line belongs to
    pub sale_id: i64,
    /// Zero-based index of the line within its sale
    pub position: i32,
    /// Book title as it was when the book was added to the cart
    pub title: String,
    /// Quantity sold
    pub quantity: i64,
}

/// Defines relationships between `SaleLine` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one sale
    #[sea_orm(
        belongs_to = "super::sale::Entity",
        from = "Column::SaleId",
        to = "super::sale::Column::Id"
    )]
    Sale,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
