//! Text rendering and argument parsing shared by the bot commands.
//!
//! Everything here is pure so it can be tested without a Discord connection.

use crate::{
    core::{
        cart::{BookId, Cart},
        money::{self, format_amount},
        sales::SaleRecord,
    },
    entities::book,
    errors::{Error, Result},
};
use chrono::{FixedOffset, NaiveDate};

/// Longest choice label Discord accepts in autocomplete
pub const MAX_CHOICE_LEN: usize = 100;

/// How a command argument names a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookReference {
    /// An explicit identifier, from `#12` or an autocomplete label like `Dune (#12)`
    Id(BookId),
    /// Anything else is treated as a title
    Title(String),
}

/// Parses a book argument. Autocomplete labels end in `(#id)`; a bare `#id` or a
/// bare number is also accepted.
#[must_use]
pub fn parse_book_reference(input: &str) -> BookReference {
    let input = input.trim();

    if let Some(id) = input
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once("(#"))
        .and_then(|(_, id)| id.parse().ok())
    {
        return BookReference::Id(id);
    }

    if let Some(id) = input.strip_prefix('#').unwrap_or(input).parse().ok() {
        return BookReference::Id(id);
    }

    BookReference::Title(input.to_string())
}

/// Longest plain message Discord accepts
pub const MAX_MESSAGE_LEN: usize = 2000;
/// Longest embed field name Discord accepts
pub const MAX_FIELD_NAME_LEN: usize = 256;
/// Longest embed field value Discord accepts
pub const MAX_FIELD_VALUE_LEN: usize = 1024;
/// Longest embed description Discord accepts
pub const MAX_DESCRIPTION_LEN: usize = 4096;
/// Room left for field text in one embed, after its title and footer
pub const MAX_EMBED_FIELDS_LEN: usize = 5500;

/// Shortens `text` to at most `limit` bytes, ending in `…` when cut.
#[must_use]
pub fn truncate_text(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut cut = limit.saturating_sub('…'.len_utf8());
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &text[..cut])
}

/// An autocomplete label: the title followed by `(#id)`, shortened to fit
/// Discord's limit without losing the identifier.
#[must_use]
pub fn choice_label(title: &str, id: BookId) -> String {
    let suffix = format!(" (#{id})");
    let room = MAX_CHOICE_LEN.saturating_sub(suffix.len());
    format!("{}{suffix}", truncate_text(title, room))
}

/// The autocomplete label for a book.
#[must_use]
pub fn book_choice(book: &book::Model) -> String {
    choice_label(&book.title, book.id)
}

/// Builds embed fields from `(name, value)` pairs within Discord's limits.
///
/// Names and values are shortened to their field limits. Fields stop being
/// added once the next one would overflow the embed.
#[must_use]
pub fn fit_fields<I>(entries: I) -> Vec<(String, String, bool)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut fields = Vec::new();
    let mut used = 0;
    for (name, value) in entries {
        let name = truncate_text(&name, MAX_FIELD_NAME_LEN);
        let value = truncate_text(&value, MAX_FIELD_VALUE_LEN);
        let size = name.len() + value.len();
        if used + size > MAX_EMBED_FIELDS_LEN {
            break;
        }
        used += size;
        fields.push((name, value, false));
    }
    fields
}

/// Finds the cart line a command argument refers to.
///
/// # Errors
/// Returns [`Error::BookNotFound`] when no line matches.
pub fn resolve_line(cart: &Cart, reference: &str) -> Result<BookId> {
    let found = match parse_book_reference(reference) {
        BookReference::Id(id) => cart.line(id).map(|line| line.id),
        BookReference::Title(title) => cart
            .items()
            .iter()
            .find(|line| line.title.eq_ignore_ascii_case(&title))
            .map(|line| line.id),
    };
    found.ok_or_else(|| Error::BookNotFound {
        id: reference.trim().to_string(),
    })
}

/// Parses a `YYYY-MM-DD` date argument.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| Error::Validation {
        message: format!("'{}' is not a date in YYYY-MM-DD form", input.trim()),
    })
}

/// Parses an optional date argument, treating blank input as absent.
pub fn parse_optional_day(input: Option<&str>) -> Result<Option<NaiveDate>> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_day)
        .transpose()
}

/// The lines of a cart followed by its total, flagging a stale total.
#[must_use]
pub fn cart_summary(cart: &Cart, symbol: &str) -> String {
    if cart.is_empty() {
        return "🛒 The cart is empty. Use `/cart add` to select a book.".to_string();
    }

    let items = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                "• **{}** × {} @ {}",
                item.title,
                item.quantity,
                format_amount(symbol, item.unit_price)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut tail = format!("**Total:** {}", format_amount(symbol, cart.total()));
    if cart.is_total_stale() {
        tail.push_str(
            "\n⚠️ Quantities changed since the total was computed. Use `/cart total` to refresh it.",
        );
    }
    let room = MAX_MESSAGE_LEN.saturating_sub(tail.len() + 1);
    format!("{}\n{tail}", truncate_text(&items, room))
}

/// One line per title of a sale, with quantities.
#[must_use]
pub fn sale_lines(sale: &SaleRecord) -> String {
    sale.lines()
        .map(|(title, quantity)| format!("{title} - Quantity: {quantity}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Total and local date of a sale, for list entries.
#[must_use]
pub fn sale_heading(sale: &SaleRecord, symbol: &str, offset: FixedOffset) -> String {
    format!(
        "Sale #{} · {} · {}",
        sale.id,
        format_amount(symbol, sale.total_price),
        sale.date.with_timezone(&offset).format("%Y-%m-%d %H:%M")
    )
}

/// Price, genre and identifier of a book, for list entries.
#[must_use]
pub fn book_line(book: &book::Model, symbol: &str) -> String {
    let price = money::to_decimal(book.price)
        .map_or_else(|_| book.price.to_string(), |p| format_amount(symbol, p));
    format!("{price} · {} · #{}", book.genre, book.id)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::sample_book;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_book_reference() {
        assert_eq!(parse_book_reference("Dune (#12)"), BookReference::Id(12));
        assert_eq!(parse_book_reference(" #7 "), BookReference::Id(7));
        assert_eq!(parse_book_reference("42"), BookReference::Id(42));
        assert_eq!(
            parse_book_reference("The Hobbit"),
            BookReference::Title("The Hobbit".to_string())
        );
        assert_eq!(
            parse_book_reference("Catch (#twenty-two)"),
            BookReference::Title("Catch (#twenty-two)".to_string())
        );
    }

    #[test]
    fn test_book_choice_round_trips_and_fits() {
        let book = sample_book(12, "Dune", 9.0);
        let label = book_choice(&book);
        assert_eq!(label, "Dune (#12)");
        assert_eq!(parse_book_reference(&label), BookReference::Id(12));

        let long = sample_book(3, &"é".repeat(120), 1.0);
        let label = book_choice(&long);
        assert!(label.len() <= MAX_CHOICE_LEN);
        assert_eq!(parse_book_reference(&label), BookReference::Id(3));
    }

    #[test]
    fn test_resolve_line_by_id_or_title() {
        let mut cart = Cart::new();
        cart.select_item(4, "Emma", Decimal::from(3)).unwrap();

        assert_eq!(resolve_line(&cart, "Emma (#4)").unwrap(), 4);
        assert_eq!(resolve_line(&cart, "emma").unwrap(), 4);
        assert!(matches!(
            resolve_line(&cart, "Persuasion"),
            Err(Error::BookNotFound { .. })
        ));
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(
            parse_day("2024-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
        assert!(matches!(parse_day("09/03/2024"), Err(Error::Validation { .. })));
        assert_eq!(parse_optional_day(Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_day(None).unwrap(), None);
    }

    #[test]
    fn test_cart_summary_flags_stale_total() {
        let mut cart = Cart::new();
        assert!(cart_summary(&cart, "$").contains("empty"));

        cart.select_item(1, "A", Decimal::from(10)).unwrap();
        cart.recompute_total().unwrap();
        let fresh = cart_summary(&cart, "$");
        assert!(fresh.contains("**A** × 1 @ $10.00"));
        assert!(fresh.contains("**Total:** $10.00"));
        assert!(!fresh.contains("⚠️"));

        cart.adjust_quantity(1, 1).unwrap();
        assert!(cart_summary(&cart, "$").contains("⚠️"));
    }

    #[test]
    fn test_sale_rendering() {
        let sale = SaleRecord {
            id: 5,
            titles: vec!["A".to_string(), "B".to_string()],
            quantities: vec![3, 1],
            total_price: Decimal::from(35),
            date: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 0).unwrap(),
            recorded_by: "staff".to_string(),
        };
        let utc = FixedOffset::east_opt(0).unwrap();

        assert_eq!(sale_lines(&sale), "A - Quantity: 3\nB - Quantity: 1");
        assert_eq!(
            sale_heading(&sale, "$", utc),
            "Sale #5 · $35.00 · 2024-01-02 03:04"
        );
    }

    #[test]
    fn test_cart_line_labels_fit_choice_limit() {
        let mut cart = Cart::new();
        let title = "Long Title ".repeat(20);
        cart.select_item(8, &title, Decimal::from(4)).unwrap();

        let line = &cart.items()[0];
        let label = choice_label(&line.title, line.id);
        assert!(label.len() <= MAX_CHOICE_LEN);
        assert!(label.ends_with("… (#8)"));
        assert_eq!(resolve_line(&cart, &label).unwrap(), 8);
    }

    #[test]
    fn test_truncate_text_respects_char_boundaries() {
        assert_eq!(truncate_text("short", 10), "short");
        let cut = truncate_text(&"ü".repeat(10), 7);
        assert!(cut.len() <= 7);
        assert_eq!(cut, "üü…");
    }

    #[test]
    fn test_fit_fields_caps_values_and_embed_size() {
        let many_lines = SaleRecord {
            id: 1,
            titles: (0..200).map(|i| format!("Title number {i}")).collect(),
            quantities: vec![1; 200],
            total_price: Decimal::from(200),
            date: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 0).unwrap(),
            recorded_by: "staff".to_string(),
        };
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(sale_lines(&many_lines).len() > MAX_FIELD_VALUE_LEN);

        let fields = fit_fields(
            std::iter::repeat_with(|| (sale_heading(&many_lines, "$", utc), sale_lines(&many_lines)))
                .take(20),
        );
        assert!(!fields.is_empty());
        assert!(fields.len() < 20);
        let total: usize = fields.iter().map(|(n, v, _)| n.len() + v.len()).sum();
        assert!(total <= MAX_EMBED_FIELDS_LEN);
        for (name, value, _) in &fields {
            assert!(name.len() <= MAX_FIELD_NAME_LEN);
            assert!(value.len() <= MAX_FIELD_VALUE_LEN);
        }
    }

    #[test]
    fn test_cart_summary_fits_message_and_keeps_total() {
        let mut cart = Cart::new();
        for id in 0..100 {
            cart.select_item(id, &format!("A rather long book title {id}"), Decimal::from(1))
                .unwrap();
        }
        let summary = cart_summary(&cart, "$");
        assert!(summary.len() <= MAX_MESSAGE_LEN);
        assert!(summary.contains("**Total:**"));
        assert!(summary.contains("⚠️"));
    }
}
