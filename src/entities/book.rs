//! Book entity - Represents a title in the shop's catalog.
//!
//! Books are the catalog items rung up at the till. The till snapshots a book's
//! title and price when it is selected, so later catalog edits never change a
//! cart that is already being built or a sale that has already been recorded.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Book database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    /// Store-assigned identifier for the book
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Title of the book (e.g., "The Hobbit")
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Unit price in the shop's currency
    pub price: f64,
    /// Genre used for catalog filtering (e.g., "fantasy")
    pub genre: String,
    /// Free-text description
    pub description: String,
    /// Optional cover image bytes
    pub image: Option<Vec<u8>>,
    /// When the book was added to the catalog
    pub created_at: DateTime,
    /// When the book was last edited
    pub updated_at: DateTime,
}

/// Books have no outgoing relations; sale lines snapshot the title instead.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
