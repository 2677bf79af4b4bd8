//! Conversions between stored prices and the decimal amounts used at the till.
//!
//! The store keeps prices as `REAL` columns. Every sum the till computes is done
//! in [`Decimal`] so that totals like `3 × 10.10` come out exact.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Converts a stored price into a decimal amount.
///
/// # Errors
/// Returns [`Error::InvalidPrice`] for NaN, infinities and values outside the
/// range of [`Decimal`].
pub fn to_decimal(amount: f64) -> Result<Decimal> {
    if !amount.is_finite() {
        return Err(Error::InvalidPrice { price: amount });
    }
    Decimal::from_f64(amount).ok_or(Error::InvalidPrice { price: amount })
}

/// Converts a decimal amount back into the stored representation.
pub fn to_stored(amount: Decimal) -> Result<f64> {
    amount.to_f64().ok_or_else(|| Error::Validation {
        message: format!("amount {amount} cannot be stored"),
    })
}

/// Formats an amount with a currency symbol and two decimal places.
#[must_use]
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    format!("{symbol}{:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_to_decimal_rejects_non_finite() {
        assert!(matches!(
            to_decimal(f64::NAN),
            Err(Error::InvalidPrice { .. })
        ));
        assert!(matches!(
            to_decimal(f64::INFINITY),
            Err(Error::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_whole_and_half_amounts_convert_exactly() {
        assert_eq!(to_decimal(10.0).unwrap(), Decimal::from(10));
        assert_eq!(to_decimal(12.5).unwrap(), Decimal::new(125, 1));
        assert_eq!(to_stored(Decimal::new(125, 1)).unwrap(), 12.5);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("$", Decimal::from(35)), "$35.00");
        assert_eq!(format_amount("£", Decimal::new(1999, 2)), "£19.99");
    }
}
