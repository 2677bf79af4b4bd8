//! Sale entity - One completed checkout at the till.
//!
//! The per-book lines of a sale live in `sale_lines`; together they form the
//! sale record with its index-aligned titles and quantities.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Total price charged for the sale
    pub total_price: f64,
    /// When the sale was submitted
    pub date: DateTimeUtc,
    /// Discord user ID of the staff member who rang it up
    pub recorded_by: String,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One sale has many lines
    #[sea_orm(has_many = "super::sale_line::Entity")]
    Lines,
}

impl Related<super::sale_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
