use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{errors::CartError, product::ProductId};

/// One distinct product in the cart. Carries only what a cart line needs to
/// render; the full product stays with the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineItem {
  pub product_id: ProductId,
  pub name: String,
  pub unit_price: Decimal,
  pub image: Option<String>,
  pub quantity: u32,
}

impl CartLineItem {
  /// `None` when the total does not fit in a `Decimal`.
  pub fn line_total(&self) -> Option<Decimal> {
    self.unit_price.checked_mul(Decimal::from(self.quantity))
  }
}

/// Read-only view of the cart at one point in time. Totals are derived from
/// the items when the snapshot is taken and never stored on their own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSnapshot {
  items: Vec<CartLineItem>,
  count: u64,
  subtotal: Decimal,
  #[serde(skip)]
  version: u64,
}

impl CartSnapshot {
  /// Fails with `InvalidPrice` for the first line whose total, or whose
  /// addition to the subtotal, overflows.
  pub(crate) fn from_items(items: Vec<CartLineItem>, version: u64) -> Result<Self, CartError> {
    let mut count: u64 = 0;
    let mut subtotal = Decimal::ZERO;

    for line in &items {
      let overflow = || CartError::InvalidPrice { input: line.unit_price.to_string() };
      let total = line.line_total().ok_or_else(overflow)?;
      subtotal = subtotal.checked_add(total).ok_or_else(overflow)?;
      count += u64::from(line.quantity);
    }

    Ok(Self { items, count, subtotal, version })
  }

  pub fn empty() -> Self {
    Self { items: vec![], count: 0, subtotal: Decimal::ZERO, version: 0 }
  }

  /// Bumped by the store on every committed change.
  pub fn version(&self) -> u64 {
    self.version
  }

  pub fn items(&self) -> &[CartLineItem] {
    &self.items
  }

  pub fn count(&self) -> u64 {
    self.count
  }

  pub fn subtotal(&self) -> Decimal {
    self.subtotal
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn line(&self, product_id: &ProductId) -> Option<&CartLineItem> {
    self.items.iter().find(|i| &i.product_id == product_id)
  }
}

/// Storage record of a cart line. The list of these, in display order, is
/// what the persistence collaborator keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCartLine {
  pub product_id: ProductId,
  pub quantity: u32,
  pub unit_price_at_add: Decimal,
  pub name: String,
  #[serde(default)]
  pub image: Option<String>,
}

impl From<&CartLineItem> for PersistedCartLine {
  fn from(line: &CartLineItem) -> Self {
    Self {
      product_id: line.product_id.clone(),
      quantity: line.quantity,
      unit_price_at_add: line.unit_price,
      name: line.name.clone(),
      image: line.image.clone(),
    }
  }
}

/// Parses a quantity typed into a form field. Anything that is not a whole
/// number is rejected; zero and negatives are left to the caller.
pub fn parse_quantity(input: &str) -> Result<i64, CartError> {
  let trimmed = input.trim();
  trimmed.parse::<i64>().map_err(|_| CartError::MalformedQuantity { input: trimmed.to_string() })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(id: &str, price: i64, quantity: u32) -> CartLineItem {
    CartLineItem {
      product_id: id.into(),
      name: id.to_uppercase(),
      unit_price: Decimal::from(price),
      image: None,
      quantity,
    }
  }

  #[test]
  fn test_snapshot_totals() {
    let snap = CartSnapshot::from_items(vec![line("a", 10, 3), line("b", 4, 2)], 1).unwrap();
    assert_eq!(snap.count(), 5);
    assert_eq!(snap.subtotal(), Decimal::from(38));
    assert_eq!(snap.line(&"b".into()).map(|l| l.quantity), Some(2));
    assert_eq!(snap.version(), 1);
  }

  #[test]
  fn test_snapshot_totals_overflow() {
    let huge = CartLineItem { unit_price: Decimal::MAX, ..line("a", 0, 2) };
    assert_eq!(huge.line_total(), None);
    assert!(matches!(CartSnapshot::from_items(vec![huge], 0), Err(CartError::InvalidPrice { .. })));

    let max = CartLineItem { unit_price: Decimal::MAX, ..line("a", 0, 1) };
    let other = CartLineItem { product_id: "b".into(), ..max.clone() };
    assert!(CartSnapshot::from_items(vec![max.clone()], 0).is_ok());
    assert!(matches!(CartSnapshot::from_items(vec![max, other], 0), Err(CartError::InvalidPrice { .. })));
  }

  #[test]
  fn test_empty_snapshot() {
    let snap = CartSnapshot::empty();
    assert!(snap.is_empty());
    assert_eq!(snap.count(), 0);
    assert_eq!(snap.subtotal(), Decimal::ZERO);
  }

  #[test]
  fn test_persisted_line_uses_camel_case() {
    let record = PersistedCartLine::from(&line("p1", 10, 2));
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["productId"], "p1");
    assert_eq!(json["quantity"], 2);
    assert_eq!(json["unitPriceAtAdd"], "10");
    assert_eq!(json["name"], "P1");
  }

  #[test]
  fn test_parse_quantity() {
    assert_eq!(parse_quantity(" 3 "), Ok(3));
    assert_eq!(parse_quantity("-2"), Ok(-2));
    assert!(matches!(parse_quantity("1.5"), Err(CartError::MalformedQuantity { .. })));
    assert!(matches!(parse_quantity("two"), Err(CartError::MalformedQuantity { .. })));
  }
}
