//! Sales business logic - Recording and browsing completed sales.
//!
//! A sale is stored as one `sales` row plus one `sale_lines` row per title. Callers
//! only ever see the assembled [`SaleRecord`], whose `titles` and `quantities` are
//! index-aligned in the order the books were added to the cart.
//!
//! Browsing filters run over the fetched history with a [`SaleFilter`]: an inclusive
//! range of calendar days, a single day, and/or a title substring. Calendar days are
//! evaluated in the shop's local offset so a sale rung up just before midnight lands
//! on the day the staff saw it happen.

use crate::{
    core::money,
    entities::{Sale, SaleLine, sale, sale_line},
    errors::{Error, Result},
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// A sale ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    /// Titles, one per line
    pub titles: Vec<String>,
    /// Quantities, index-aligned with `titles`
    pub quantities: Vec<i64>,
    /// Total charged
    pub total_price: Decimal,
    /// Submission time
    pub date: DateTime<Utc>,
    /// Staff member who rang it up
    pub recorded_by: String,
}

/// A recorded sale. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    /// Store-assigned identifier
    pub id: i64,
    /// Titles, one per line
    pub titles: Vec<String>,
    /// Quantities, index-aligned with `titles`
    pub quantities: Vec<i64>,
    /// Total charged
    pub total_price: Decimal,
    /// Submission time
    pub date: DateTime<Utc>,
    /// Staff member who rang it up
    pub recorded_by: String,
}

impl SaleRecord {
    fn from_parts(sale: sale::Model, mut lines: Vec<sale_line::Model>) -> Result<Self> {
        lines.sort_by_key(|line| line.position);
        let (titles, quantities) = lines
            .into_iter()
            .map(|line| (line.title, line.quantity))
            .unzip();

        Ok(Self {
            id: sale.id,
            titles,
            quantities,
            total_price: money::to_decimal(sale.total_price)?,
            date: sale.date,
            recorded_by: sale.recorded_by,
        })
    }

    /// Iterates over `(title, quantity)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (&str, i64)> {
        self.titles
            .iter()
            .map(String::as_str)
            .zip(self.quantities.iter().copied())
    }
}

/// Writes a sale and its lines in a single database transaction.
///
/// # Errors
/// Returns an error if:
/// - `titles` and `quantities` have different lengths
/// - The sale has no lines
/// - The database write fails (nothing is written in that case)
pub async fn record_sale(db: &DatabaseConnection, new_sale: NewSale) -> Result<SaleRecord> {
    if new_sale.titles.len() != new_sale.quantities.len() {
        return Err(Error::Validation {
            message: format!(
                "sale has {} titles but {} quantities",
                new_sale.titles.len(),
                new_sale.quantities.len()
            ),
        });
    }
    if new_sale.titles.is_empty() {
        return Err(Error::EmptyCart);
    }

    let total_price = money::to_stored(new_sale.total_price)?;
    let lines = new_sale
        .titles
        .iter()
        .zip(&new_sale.quantities)
        .enumerate()
        .map(|(index, (title, quantity))| {
            let position = i32::try_from(index).map_err(|_| Error::Validation {
                message: "too many lines in one sale".to_string(),
            })?;
            Ok((position, title.clone(), *quantity))
        })
        .collect::<Result<Vec<_>>>()?;

    // Use a transaction so a sale is never stored without its lines
    let txn = db.begin().await?;

    let saved = sale::ActiveModel {
        total_price: Set(total_price),
        date: Set(new_sale.date),
        recorded_by: Set(new_sale.recorded_by.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let line_models = lines
        .into_iter()
        .map(|(position, title, quantity)| sale_line::ActiveModel {
            sale_id: Set(saved.id),
            position: Set(position),
            title: Set(title),
            quantity: Set(quantity),
            ..Default::default()
        });
    SaleLine::insert_many(line_models).exec(&txn).await?;

    txn.commit().await?;

    info!(sale_id = saved.id, total = %new_sale.total_price, "Recorded sale");
    Ok(SaleRecord {
        id: saved.id,
        titles: new_sale.titles,
        quantities: new_sale.quantities,
        total_price: money::to_decimal(saved.total_price)?,
        date: saved.date,
        recorded_by: saved.recorded_by,
    })
}

/// Retrieves a sale with its lines.
pub async fn get_sale_by_id(db: &DatabaseConnection, sale_id: i64) -> Result<Option<SaleRecord>> {
    let Some(sale) = Sale::find_by_id(sale_id).one(db).await? else {
        return Ok(None);
    };

    let lines = sale
        .find_related(SaleLine)
        .order_by_asc(sale_line::Column::Position)
        .all(db)
        .await?;
    SaleRecord::from_parts(sale, lines).map(Some)
}

/// Retrieves every sale, newest first.
pub async fn list_sales(db: &DatabaseConnection) -> Result<Vec<SaleRecord>> {
    let rows = Sale::find()
        .order_by_desc(sale::Column::Date)
        .find_with_related(SaleLine)
        .all(db)
        .await?;

    let mut records = rows
        .into_iter()
        .map(|(sale, lines)| SaleRecord::from_parts(sale, lines))
        .collect::<Result<Vec<_>>>()?;
    records.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    debug!("Loaded {} sales", records.len());
    Ok(records)
}

/// Retrieves the sales matching a filter, newest first.
pub async fn find_sales(db: &DatabaseConnection, filter: &SaleFilter) -> Result<Vec<SaleRecord>> {
    Ok(filter.apply(list_sales(db).await?))
}

/// Criteria for browsing the sale history. Unset criteria match everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleFilter {
    /// First calendar day included
    pub from: Option<NaiveDate>,
    /// Last calendar day included
    pub to: Option<NaiveDate>,
    /// Case-insensitive substring matched against every title of a sale
    pub title: Option<String>,
    /// Offset used to turn sale timestamps into calendar days
    pub offset: FixedOffset,
}

impl SaleFilter {
    /// A filter that matches every sale, with days evaluated at `offset`.
    #[must_use]
    pub const fn new(offset: FixedOffset) -> Self {
        Self {
            from: None,
            to: None,
            title: None,
            offset,
        }
    }

    /// Restricts to an inclusive range of days; either end may be open.
    #[must_use]
    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Restricts to a single calendar day.
    #[must_use]
    pub fn on_day(self, day: NaiveDate) -> Self {
        self.between(Some(day), Some(day))
    }

    /// Restricts to sales with a title containing `text`. Blank text is ignored.
    #[must_use]
    pub fn with_title(mut self, text: &str) -> Self {
        let text = text.trim();
        self.title = (!text.is_empty()).then(|| text.to_lowercase());
        self
    }

    /// The calendar day a sale falls on in this filter's offset.
    #[must_use]
    pub fn local_day(&self, sale: &SaleRecord) -> NaiveDate {
        sale.date.with_timezone(&self.offset).date_naive()
    }

    /// Whether a sale satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, sale: &SaleRecord) -> bool {
        let day = self.local_day(sale);
        let in_range =
            self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to);
        let title_match = self.title.as_ref().is_none_or(|needle| {
            sale.titles
                .iter()
                .any(|title| title.to_lowercase().contains(needle.as_str()))
        });
        in_range && title_match
    }

    /// Keeps the matching sales, preserving order.
    #[must_use]
    pub fn apply(&self, sales: Vec<SaleRecord>) -> Vec<SaleRecord> {
        sales.into_iter().filter(|sale| self.matches(sale)).collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: i64, titles: &[&str], date: DateTime<Utc>) -> SaleRecord {
        SaleRecord {
            id,
            titles: titles.iter().map(ToString::to_string).collect(),
            quantities: vec![1; titles.len()],
            total_price: Decimal::from(10),
            date,
            recorded_by: "staff".to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_sale_rejects_misaligned_lines() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let mut sale = new_sale(&["A", "B"], &[1, 2], 20);
        sale.quantities.pop();

        let result = record_sale(&db, sale).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_record_and_get_sale() -> Result<()> {
        let db = setup_test_db().await?;
        let record = record_sale(&db, new_sale(&["Dune", "Emma"], &[2, 1], 31)).await?;

        let stored = get_sale_by_id(&db, record.id).await?.unwrap();
        assert_eq!(stored.titles, vec!["Dune", "Emma"]);
        assert_eq!(stored.quantities, vec![2, 1]);
        assert_eq!(stored.total_price, Decimal::from(31));
        assert_eq!(
            stored.lines().collect::<Vec<_>>(),
            vec![("Dune", 2), ("Emma", 1)]
        );

        assert!(get_sale_by_id(&db, 999).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_sales_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let mut older = new_sale(&["Old"], &[1], 5);
        older.date = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let mut newer = new_sale(&["New", "Newer"], &[1, 4], 9);
        newer.date = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();

        record_sale(&db, older).await?;
        record_sale(&db, newer).await?;

        let sales = list_sales(&db).await?;
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].titles, vec!["New", "Newer"]);
        assert_eq!(sales[0].quantities, vec![1, 4]);
        assert_eq!(sales[1].titles, vec!["Old"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_sales_applies_filter() -> Result<()> {
        let db = setup_test_db().await?;
        let mut first = new_sale(&["The Hobbit"], &[1], 10);
        first.date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut second = new_sale(&["Dune"], &[1], 10);
        second.date = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
        record_sale(&db, first).await?;
        record_sale(&db, second).await?;

        let filter = SaleFilter::new(utc()).with_title("hobbit");
        let found = find_sales(&db, &filter).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].titles, vec!["The Hobbit"]);
        Ok(())
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let sales = vec![
            record(1, &["A"], Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            record(2, &["B"], Utc.with_ymd_and_hms(2024, 5, 3, 23, 59, 59).unwrap()),
            record(3, &["C"], Utc.with_ymd_and_hms(2024, 5, 4, 0, 0, 0).unwrap()),
        ];

        let filter = SaleFilter::new(utc()).between(Some(day(2024, 5, 1)), Some(day(2024, 5, 3)));
        let ids: Vec<i64> = filter.apply(sales.clone()).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let open_start = SaleFilter::new(utc()).between(None, Some(day(2024, 5, 1)));
        assert_eq!(open_start.apply(sales.clone()).len(), 1);

        let open_end = SaleFilter::new(utc()).between(Some(day(2024, 5, 2)), None);
        assert_eq!(open_end.apply(sales).len(), 2);
    }

    #[test]
    fn test_title_match_is_case_insensitive_over_any_line() {
        let sale = record(
            1,
            &["The Fellowship", "The Two Towers"],
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        );

        assert!(SaleFilter::new(utc()).with_title("TOWERS").matches(&sale));
        assert!(SaleFilter::new(utc()).with_title("  ").matches(&sale));
        assert!(!SaleFilter::new(utc()).with_title("Return").matches(&sale));
    }

    #[test]
    fn test_on_day_uses_local_offset() {
        // 23:30 UTC on the 1st is already the 2nd two hours east of UTC
        let sale = record(1, &["A"], Utc.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap());
        let east = FixedOffset::east_opt(2 * 3600).unwrap();

        assert!(SaleFilter::new(utc()).on_day(day(2024, 6, 1)).matches(&sale));
        assert!(!SaleFilter::new(east).on_day(day(2024, 6, 1)).matches(&sale));
        assert!(SaleFilter::new(east).on_day(day(2024, 6, 2)).matches(&sale));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let sales = vec![
            record(1, &["A"], Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
            record(2, &["B"], Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
        ];
        assert_eq!(SaleFilter::new(utc()).apply(sales).len(), 2);
    }
}
