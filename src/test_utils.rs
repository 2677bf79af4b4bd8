//! Shared test utilities for `BookBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test books and sales with sensible defaults.

use crate::{
    core::{
        catalog::{self, BookDetails},
        sales::NewSale,
    },
    entities,
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Book details with sensible defaults.
///
/// # Defaults
/// * `author`: "Test Author"
/// * `genre`: "fantasy"
/// * `description`: empty
pub fn book_details(title: &str, price: f64) -> BookDetails {
    BookDetails {
        title: title.to_string(),
        author: "Test Author".to_string(),
        price,
        genre: "fantasy".to_string(),
        description: String::new(),
    }
}

/// Creates a test book with default author and genre.
pub async fn create_test_book(
    db: &DatabaseConnection,
    title: &str,
    price: f64,
) -> Result<entities::book::Model> {
    catalog::create_book(db, book_details(title, price), None).await
}

/// Creates a test book with a custom author and genre.
pub async fn create_custom_book(
    db: &DatabaseConnection,
    title: &str,
    author: &str,
    price: f64,
    genre: &str,
) -> Result<entities::book::Model> {
    let details = BookDetails {
        author: author.to_string(),
        genre: genre.to_string(),
        ..book_details(title, price)
    };
    catalog::create_book(db, details, None).await
}

/// Builds an in-memory book model without touching a database.
pub fn sample_book(id: i64, title: &str, price: f64) -> entities::book::Model {
    let now = chrono::Utc::now().naive_utc();
    entities::book::Model {
        id,
        title: title.to_string(),
        author: "Test Author".to_string(),
        price,
        genre: "fantasy".to_string(),
        description: String::new(),
        image: None,
        created_at: now,
        updated_at: now,
    }
}

/// Builds a sale to record, dated now, recorded by `"test_staff"`.
pub fn new_sale(titles: &[&str], quantities: &[i64], total: i64) -> NewSale {
    NewSale {
        titles: titles.iter().map(ToString::to_string).collect(),
        quantities: quantities.to_vec(),
        total_price: Decimal::from(total),
        date: chrono::Utc::now(),
        recorded_by: "test_staff".to_string(),
    }
}
