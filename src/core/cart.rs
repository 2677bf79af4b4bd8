//! Cart aggregation and checkout for the till.
//!
//! A [`Cart`] collects the books selected for one sale. Selecting a book that is
//! already in the cart bumps its quantity instead of adding a second line, so a
//! cart holds at most one [`LineItem`] per book. Quantity edits never add or remove
//! lines.
//!
//! The cart total is only refreshed by [`Cart::recompute_total`], the explicit
//! "add item" step at the till; quantity edits leave it stale until then and
//! [`Cart::is_total_stale`] reports that. [`checkout`] always recomputes before
//! persisting, so a recorded sale never carries a stale total.

use crate::{
    core::{
        money,
        sales::{self, NewSale, SaleRecord},
    },
    entities::book,
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

/// Store-assigned book identifier
pub type BookId = i64;

/// One book in the cart, with the title and price it had when it was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Identifier of the selected book
    pub id: BookId,
    /// Title snapshotted at selection time
    pub title: String,
    /// Unit price snapshotted at selection time
    pub unit_price: Decimal,
    /// Number of copies
    pub quantity: i64,
}

impl LineItem {
    /// Unit price times quantity, or `None` if it does not fit in a decimal.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sum over the lines of unit price times quantity.
///
/// # Errors
/// Returns [`Error::TotalOverflow`] if a subtotal or the sum does not fit in a
/// decimal.
pub fn compute_total(items: &[LineItem]) -> Result<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        item.subtotal()
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or(Error::TotalOverflow)
    })
}

/// The lines of one sale in progress, in the order they were first selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
    total: Decimal,
}

impl Cart {
    /// Creates an empty cart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines in insertion order
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct books in the cart
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing has been selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for a book, if it is in the cart
    #[must_use]
    pub fn line(&self, id: BookId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The total as of the last [`Cart::recompute_total`].
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// True when quantity edits since the last recompute changed the true total.
    #[must_use]
    pub fn is_total_stale(&self) -> bool {
        compute_total(&self.items).map_or(true, |total| total != self.total)
    }

    /// Adds one copy of a book, merging with an existing line for the same id.
    ///
    /// # Errors
    /// Returns [`Error::InvalidQuantity`] if the merged quantity would overflow;
    /// the cart is left unchanged.
    pub fn select_item(
        &mut self,
        id: BookId,
        title: &str,
        unit_price: Decimal,
    ) -> Result<&LineItem> {
        let index = match self.items.iter().position(|item| item.id == id) {
            Some(index) => {
                let line = &mut self.items[index];
                line.quantity = line
                    .quantity
                    .checked_add(1)
                    .ok_or(Error::InvalidQuantity { quantity: i64::MAX })?;
                index
            }
            None => {
                self.items.push(LineItem {
                    id,
                    title: title.to_string(),
                    unit_price,
                    quantity: 1,
                });
                self.items.len() - 1
            }
        };
        let line = &self.items[index];
        debug!(book_id = id, quantity = line.quantity, "Selected book");
        Ok(line)
    }

    /// Adds one copy of a catalog book.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPrice`] if the stored price cannot be represented
    /// as a decimal, or the errors of [`Cart::select_item`].
    pub fn select_book(&mut self, book: &book::Model) -> Result<&LineItem> {
        let unit_price = money::to_decimal(book.price)?;
        self.select_item(book.id, &book.title, unit_price)
    }

    /// Replaces the quantity of a line. The stored total is not touched.
    ///
    /// Zero keeps the line in the cart. Negative quantities are rejected and
    /// leave the cart unchanged.
    ///
    /// # Errors
    /// Returns an error if:
    /// - No line exists for `id`
    /// - `quantity` is negative
    pub fn set_quantity(&mut self, id: BookId, quantity: i64) -> Result<&LineItem> {
        let line = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(Error::LineItemNotFound { id })?;

        if quantity < 0 {
            return Err(Error::InvalidQuantity { quantity });
        }

        line.quantity = quantity;
        Ok(line)
    }

    /// Changes the quantity of a line by `delta` (the +/- controls).
    ///
    /// # Errors
    /// Same as [`Cart::set_quantity`]; overflow is reported as an invalid quantity.
    pub fn adjust_quantity(&mut self, id: BookId, delta: i64) -> Result<&LineItem> {
        let current = self.line(id).ok_or(Error::LineItemNotFound { id })?.quantity;
        let quantity = current
            .checked_add(delta)
            .ok_or(Error::InvalidQuantity { quantity: i64::MAX })?;
        self.set_quantity(id, quantity)
    }

    /// Recomputes and stores the total.
    ///
    /// # Errors
    /// Returns [`Error::TotalOverflow`] if the total does not fit in a decimal;
    /// the stored total is left as it was.
    pub fn recompute_total(&mut self) -> Result<Decimal> {
        self.total = compute_total(&self.items)?;
        Ok(self.total)
    }

    /// Empties the cart and resets the total.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Decimal::ZERO;
    }

    /// Index-aligned titles and quantities of the lines.
    #[must_use]
    pub fn sale_lines(&self) -> (Vec<String>, Vec<i64>) {
        self.items
            .iter()
            .map(|item| (item.title.clone(), item.quantity))
            .unzip()
    }
}

/// Records the cart as a sale and clears it.
///
/// The total is recomputed immediately before the sale is built. An empty cart is
/// rejected without touching the store. If the store write fails the error is
/// returned unchanged and the cart keeps its lines.
///
/// # Errors
/// Returns [`Error::EmptyCart`] for an empty cart, [`Error::TotalOverflow`] if the
/// total does not fit, or the store error.
pub async fn checkout(
    db: &DatabaseConnection,
    cart: &mut Cart,
    recorded_by: &str,
) -> Result<SaleRecord> {
    if cart.is_empty() {
        return Err(Error::EmptyCart);
    }

    let total_price = cart.recompute_total()?;
    let (titles, quantities) = cart.sale_lines();
    let new_sale = NewSale {
        titles,
        quantities,
        total_price,
        date: chrono::Utc::now(),
        recorded_by: recorded_by.to_string(),
    };

    let record = sales::record_sale(db, new_sale).await?;
    cart.clear();

    info!(
        sale_id = record.id,
        lines = record.titles.len(),
        total = %record.total_price,
        "Checked out cart"
    );
    Ok(record)
}
