use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::errors::CartError;

/// Formats a price with two decimals, e.g. `$19.90`.
pub fn format_price(price: Decimal, symbol: &str) -> String {
  let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  format!("{}{:.2}", symbol, rounded)
}

/// Parses a price coming from an untyped source. Negative and non-numeric
/// input is rejected.
pub fn parse_price(input: &str) -> Result<Decimal, CartError> {
  let trimmed = input.trim();
  let price = Decimal::from_str(trimmed)
    .map_err(|_| CartError::InvalidPrice { input: trimmed.to_string() })?;

  if price.is_sign_negative() {
    return Err(CartError::InvalidPrice { input: trimmed.to_string() });
  }

  Ok(price)
}
