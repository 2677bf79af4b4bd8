//! Catalog business logic - Handles all book-related operations.
//!
//! This module provides functions for adding, editing, retrieving and searching the
//! books the shop sells. Lookups used by the till (`suggest_books_by_title`) go to the
//! store; the free-text filter used when browsing the catalog (`filter_books`) runs
//! over an already fetched list, matching on title or author.

use crate::{
    entities::{Book, book},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*, sea_query::LikeExpr};
use tracing::{debug, info};

/// The editable fields of a book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetails {
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Unit price
    pub price: f64,
    /// Genre
    pub genre: String,
    /// Free-text description
    pub description: String,
}

impl BookDetails {
    /// Checks the details and returns them with surrounding whitespace removed.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The title is empty or whitespace-only
    /// - The price is negative or not finite (NaN, infinity)
    pub fn validated(self) -> Result<Self> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation {
                message: "Book title cannot be empty".to_string(),
            });
        }

        if self.price < 0.0 || !self.price.is_finite() {
            return Err(Error::InvalidPrice { price: self.price });
        }

        Ok(Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            price: self.price,
            genre: self.genre.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

impl From<&book::Model> for BookDetails {
    fn from(model: &book::Model) -> Self {
        Self {
            title: model.title.clone(),
            author: model.author.clone(),
            price: model.price,
            genre: model.genre.clone(),
            description: model.description.clone(),
        }
    }
}

/// Rejects cover images larger than `limit` bytes.
pub fn validate_image(image: &[u8], limit: usize) -> Result<()> {
    if image.len() > limit {
        return Err(Error::ImageTooLarge {
            size: image.len(),
            limit,
        });
    }
    Ok(())
}

/// Adds a book to the catalog.
///
/// # Errors
/// Returns an error if the details fail validation or the insert fails.
pub async fn create_book(
    db: &DatabaseConnection,
    details: BookDetails,
    image: Option<Vec<u8>>,
) -> Result<book::Model> {
    let details = details.validated()?;
    let now = chrono::Utc::now().naive_utc();

    let book = book::ActiveModel {
        title: Set(details.title),
        author: Set(details.author),
        price: Set(details.price),
        genre: Set(details.genre),
        description: Set(details.description),
        image: Set(image),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let book = book.insert(db).await?;
    info!(book_id = book.id, title = %book.title, "Added book to catalog");
    Ok(book)
}

/// Replaces the text fields and price of an existing book. The cover image is kept.
///
/// # Errors
/// Returns an error if:
/// - The details fail validation
/// - The book does not exist
/// - The database update fails
pub async fn update_book(
    db: &DatabaseConnection,
    book_id: i64,
    details: BookDetails,
) -> Result<book::Model> {
    let details = details.validated()?;

    let mut book: book::ActiveModel = find_existing(db, book_id).await?.into();
    book.title = Set(details.title);
    book.author = Set(details.author);
    book.price = Set(details.price);
    book.genre = Set(details.genre);
    book.description = Set(details.description);
    book.updated_at = Set(chrono::Utc::now().naive_utc());

    let book = book.update(db).await?;
    info!(book_id = book.id, "Updated book");
    Ok(book)
}

/// Replaces (or with `None`, removes) the cover image of a book.
pub async fn set_book_image(
    db: &DatabaseConnection,
    book_id: i64,
    image: Option<Vec<u8>>,
) -> Result<book::Model> {
    let mut book: book::ActiveModel = find_existing(db, book_id).await?.into();
    book.image = Set(image);
    book.updated_at = Set(chrono::Utc::now().naive_utc());
    book.update(db).await.map_err(Into::into)
}

async fn find_existing(db: &DatabaseConnection, book_id: i64) -> Result<book::Model> {
    Book::find_by_id(book_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::BookNotFound {
            id: book_id.to_string(),
        })
}

/// Retrieves a specific book by its identifier.
pub async fn get_book_by_id(db: &DatabaseConnection, book_id: i64) -> Result<Option<book::Model>> {
    Book::find_by_id(book_id).one(db).await.map_err(Into::into)
}

/// Finds a book by its exact title.
pub async fn get_book_by_title(db: &DatabaseConnection, title: &str) -> Result<Option<book::Model>> {
    Book::find()
        .filter(book::Column::Title.eq(title.trim()))
        .order_by_asc(book::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every book, ordered alphabetically by title.
pub async fn get_all_books(db: &DatabaseConnection) -> Result<Vec<book::Model>> {
    Book::find()
        .order_by_asc(book::Column::Title)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the books of one genre (exact match), ordered by title.
pub async fn get_books_by_genre(db: &DatabaseConnection, genre: &str) -> Result<Vec<book::Model>> {
    Book::find()
        .filter(book::Column::Genre.eq(genre))
        .order_by_asc(book::Column::Title)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the catalog, optionally restricted to a genre.
pub async fn list_books(db: &DatabaseConnection, genre: Option<&str>) -> Result<Vec<book::Model>> {
    match genre.map(str::trim).filter(|g| !g.is_empty()) {
        Some(genre) => get_books_by_genre(db, genre).await,
        None => get_all_books(db).await,
    }
}

/// Suggests books whose title starts with `query`, for selection at the till.
///
/// A blank query returns no suggestions and does not touch the store. `%` and `_`
/// in the query match themselves.
pub async fn suggest_books_by_title(
    db: &DatabaseConnection,
    query: &str,
    limit: u64,
) -> Result<Vec<book::Model>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    debug!("Suggesting books for '{query}'");
    Book::find()
        .filter(book::Column::Title.like(LikeExpr::new(like_prefix(query)).escape(LIKE_ESCAPE)))
        .order_by_asc(book::Column::Title)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Escape character for `LIKE` patterns
const LIKE_ESCAPE: char = '!';

/// A `LIKE` pattern matching strings that start with `prefix` literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Keeps the books whose title or author contains `query`, ignoring case.
#[must_use]
pub fn filter_books(books: Vec<book::Model>, query: &str) -> Vec<book::Model> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return books;
    }

    books
        .into_iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&needle) || b.author.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_book_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_book(&db, book_details("   ", 10.0), None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = create_book(&db, book_details("Dune", -1.0), None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidPrice { price: -1.0 }
        ));

        let result = create_book(&db, book_details("Dune", f64::NAN), None).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { .. }));

        // Validation failures never reach the store
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_book_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let details = BookDetails {
            title: "  The Hobbit ".to_string(),
            author: "J.R.R. Tolkien".to_string(),
            price: 12.5,
            genre: "fantasy".to_string(),
            description: "There and back again".to_string(),
        };
        let book = create_book(&db, details, Some(vec![1, 2, 3])).await?;

        assert_eq!(book.title, "The Hobbit");
        assert_eq!(book.price, 12.5);
        assert_eq!(book.image, Some(vec![1, 2, 3]));

        let found = get_book_by_id(&db, book.id).await?.unwrap();
        assert_eq!(found, book);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_book_keeps_image() -> Result<()> {
        let db = setup_test_db().await?;
        let book = create_book(&db, book_details("Original", 10.0), Some(vec![9])).await?;

        let mut details = BookDetails::from(&book);
        details.title = "Updated".to_string();
        details.price = 15.0;
        let updated = update_book(&db, book.id, details).await?;

        assert_eq!(updated.id, book.id);
        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.price, 15.0);
        assert_eq!(updated.image, Some(vec![9]));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_book() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_book(&db, 999, book_details("Nope", 1.0)).await;
        assert!(matches!(result.unwrap_err(), Error::BookNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_and_remove_image() -> Result<()> {
        let db = setup_test_db().await?;
        let book = create_test_book(&db, "Cover Story", 8.0).await?;
        assert!(book.image.is_none());

        let with_cover = set_book_image(&db, book.id, Some(vec![0xFF, 0xD8])).await?;
        assert_eq!(with_cover.image, Some(vec![0xFF, 0xD8]));

        let without = set_book_image(&db, book.id, None).await?;
        assert!(without.image.is_none());
        Ok(())
    }

    #[test]
    fn test_validate_image_limit() {
        assert!(validate_image(&[0; 4], 4).is_ok());
        assert!(matches!(
            validate_image(&[0; 5], 4),
            Err(Error::ImageTooLarge { size: 5, limit: 4 })
        ));
    }

    #[tokio::test]
    async fn test_list_books_by_genre() -> Result<()> {
        let db = setup_test_db().await?;
        create_custom_book(&db, "Zeta", "A", 1.0, "fantasy").await?;
        create_custom_book(&db, "Alpha", "B", 2.0, "fantasy").await?;
        create_custom_book(&db, "Beta", "C", 3.0, "Action").await?;

        let all = list_books(&db, None).await?;
        let titles: Vec<&str> = all.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "Zeta"]);

        let fantasy = list_books(&db, Some("fantasy")).await?;
        assert_eq!(fantasy.len(), 2);
        assert!(fantasy.iter().all(|b| b.genre == "fantasy"));

        let blank = list_books(&db, Some("  ")).await?;
        assert_eq!(blank.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_suggest_books_by_title_prefix() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_book(&db, "The Hobbit", 10.0).await?;
        create_test_book(&db, "The Silmarillion", 20.0).await?;
        create_test_book(&db, "A Thief in the Night", 5.0).await?;

        let suggestions = suggest_books_by_title(&db, "The", 10).await?;
        let titles: Vec<&str> = suggestions.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["The Hobbit", "The Silmarillion"]);

        let limited = suggest_books_by_title(&db, "The", 1).await?;
        assert_eq!(limited.len(), 1);
        Ok(())
    }

    #[test]
    fn test_like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("Dune"), "Dune%");
        assert_eq!(like_prefix("100%_!"), "100!%!_!!%");
    }

    #[tokio::test]
    async fn test_suggestions_treat_wildcards_literally() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_book(&db, "100% Cotton", 10.0).await?;
        create_test_book(&db, "1000 Cranes", 10.0).await?;
        create_test_book(&db, "A_B Testing", 10.0).await?;
        create_test_book(&db, "AXB Ciphers", 10.0).await?;

        let percent = suggest_books_by_title(&db, "100%", 10).await?;
        let titles: Vec<&str> = percent.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["100% Cotton"]);

        let underscore = suggest_books_by_title(&db, "A_", 10).await?;
        let titles: Vec<&str> = underscore.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["A_B Testing"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_suggestion_query_skips_store() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let suggestions = suggest_books_by_title(&db, "   ", 10).await?;
        assert!(suggestions.is_empty());
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_book_by_title() -> Result<()> {
        let db = setup_test_db().await?;
        let book = create_test_book(&db, "Dune", 9.0).await?;

        let found = get_book_by_title(&db, " Dune ").await?.unwrap();
        assert_eq!(found.id, book.id);
        assert!(get_book_by_title(&db, "Dun").await?.is_none());
        Ok(())
    }

    #[test]
    fn test_filter_books_matches_title_or_author() {
        let now = chrono::Utc::now().naive_utc();
        let make = |id, title: &str, author: &str| book::Model {
            id,
            title: title.to_string(),
            author: author.to_string(),
            price: 1.0,
            genre: "fantasy".to_string(),
            description: String::new(),
            image: None,
            created_at: now,
            updated_at: now,
        };
        let books = vec![
            make(1, "The Hobbit", "Tolkien"),
            make(2, "Mistborn", "Sanderson"),
            make(3, "Elantris", "Brandon Sanderson"),
        ];

        let by_author = filter_books(books.clone(), "SANDERSON");
        assert_eq!(by_author.len(), 2);

        let by_title = filter_books(books.clone(), "hob");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, 1);

        assert_eq!(filter_books(books, " ").len(), 3);
    }
}
