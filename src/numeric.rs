//! Decimal conventions of the EFD wire format.
//!
//! Monetary and quantity fields are stored as strings with a comma decimal
//! separator and, for currency, two fraction digits. All arithmetic runs on
//! [`rust_decimal::Decimal`]; the comma convention exists only at the field
//! boundary.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::RuleError;

/// Parse a raw field value as a decimal, accepting the format's comma
/// separator. Empty or garbage input is a [`RuleError::InvalidDecimal`] so a
/// failed rule can report exactly which field was bad.
pub fn parse_field_decimal(index: usize, raw: &str) -> Result<Decimal, RuleError> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<Decimal>()
        .map_err(|_| RuleError::InvalidDecimal {
            index,
            value: raw.to_string(),
        })
}

/// Round to the cent with half-up semantics, the rounding the tax authority
/// applies to contribution values.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a decimal back into the field convention: two fraction digits,
/// comma separator.
pub fn format_field_decimal(value: Decimal) -> String {
    format!("{:.2}", round_currency(value)).replace('.', ",")
}
