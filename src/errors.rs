//! Unified error type for `BookBuddy`.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation failures
//! carry enough context for the bot layer to explain them to the user; store
//! failures are passed through unmodified.

use thiserror::Error;

/// All errors produced by the catalog, till and sales layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The backing store rejected or failed a query
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No book exists with the given identifier
    #[error("Book not found: {id}")]
    BookNotFound {
        /// Identifier or title that was looked up
        id: String,
    },

    /// No sale exists with the given identifier
    #[error("Sale not found: {id}")]
    SaleNotFound {
        /// Identifier that was looked up
        id: i64,
    },

    /// The cart has no line for the given book
    #[error("No line item for book {id} in the cart")]
    LineItemNotFound {
        /// Book identifier
        id: i64,
    },

    /// Checkout was attempted on a cart without line items
    #[error("Nothing to add: the cart is empty")]
    EmptyCart,

    /// A price is negative, NaN, infinite or not representable as a decimal
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// The rejected price
        price: f64,
    },

    /// A quantity would drop below zero or overflow
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// A line subtotal or the cart total does not fit in a decimal
    #[error("The cart total is too large to compute")]
    TotalOverflow,

    /// Input failed a validation rule
    #[error("Invalid input: {message}")]
    Validation {
        /// Which rule failed
        message: String,
    },

    /// A cover image exceeds the configured size limit
    #[error("Image too large: {size} bytes (limit {limit} bytes)")]
    ImageTooLarge {
        /// Size of the rejected image
        size: usize,
        /// Configured limit
        limit: usize,
    },

    /// The caller is not on the staff roster
    #[error("User {user_id} is not allowed to use the till")]
    NotStaff {
        /// Discord user ID of the caller
        user_id: String,
    },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Returns true for errors caused by user input rather than the store or the
    /// framework. The bot layer shows these to the user instead of logging them.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::BookNotFound { .. }
                | Self::SaleNotFound { .. }
                | Self::LineItemNotFound { .. }
                | Self::EmptyCart
                | Self::InvalidPrice { .. }
                | Self::InvalidQuantity { .. }
                | Self::TotalOverflow
                | Self::Validation { .. }
                | Self::ImageTooLarge { .. }
                | Self::NotStaff { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
