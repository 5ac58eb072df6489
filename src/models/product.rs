use std::str::FromStr;

use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Opaque catalog identifier. The catalog service may hand out strings or
/// numbers, both are kept as their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.trim().is_empty()
  }
}

impl From<&str> for ProductId {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl From<String> for ProductId {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl<'de> Deserialize<'de> for ProductId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
      Text(String),
      Number(Number),
    }

    match RawId::deserialize(deserializer)? {
      RawId::Text(s) => Ok(ProductId(s)),
      RawId::Number(n) => Ok(ProductId(n.to_string())),
    }
  }
}

/// A catalog item as handed over by the catalog service. Display fields are
/// optional so a half-filled record still reaches the card, which renders
/// placeholders instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: ProductId,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default, deserialize_with = "lenient_price")]
  pub price: Option<Decimal>,
  #[serde(default)]
  pub image: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
}

impl Product {
  pub fn new(
    id: impl Into<ProductId>,
    name: impl Into<String>,
    price: Decimal,
    image: impl Into<String>,
    category: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      name: Some(name.into()),
      price: Some(price),
      image: Some(image.into()),
      category: Some(category.into()),
    }
  }

  /// Trimmed name, `None` when missing or blank.
  pub fn display_name(&self) -> Option<&str> {
    self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
  }

  pub fn display_image(&self) -> Option<&str> {
    self.image.as_deref().map(str::trim).filter(|i| !i.is_empty())
  }

  pub fn display_category(&self) -> Option<&str> {
    self.category.as_deref().map(str::trim).filter(|c| !c.is_empty())
  }

  /// Negative prices are treated the same as a missing one.
  pub fn display_price(&self) -> Option<Decimal> {
    self.price.filter(|p| !p.is_sign_negative())
  }
}

// A price the catalog sends as a number, a numeric string, or garbage. Garbage
// becomes `None` rather than failing the whole record.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<Value>::deserialize(deserializer)?;
  let price = match raw {
    Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
      .or_else(|_| Decimal::from_scientific(&n.to_string()))
      .ok(),
    Some(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
    _ => None,
  };

  Ok(price)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_numeric_and_string_ids() {
    let products: Vec<Product> =
      serde_json::from_str(r#"[{"id": 7, "name": "Whey"}, {"id": "p-2"}]"#).unwrap();
    assert_eq!(products[0].id, ProductId::from("7"));
    assert_eq!(products[1].id.as_str(), "p-2");
  }

  #[test]
  fn test_large_and_float_ids() {
    let products: Vec<Product> =
      serde_json::from_str(r#"[{"id": 18446744073709551615}, {"id": 7.5}]"#).unwrap();
    assert_eq!(products[0].id.as_str(), "18446744073709551615");
    assert_eq!(products[1].id.as_str(), "7.5");
  }

  #[test]
  fn test_price_forms() {
    let products: Vec<Product> = serde_json::from_str(
      r#"[
        {"id": "a", "price": 19.99},
        {"id": "b", "price": "5"},
        {"id": "c", "price": "free"},
        {"id": "d"}
      ]"#,
    )
    .unwrap();

    assert_eq!(products[0].price, Some(Decimal::new(1999, 2)));
    assert_eq!(products[1].price, Some(Decimal::from(5)));
    assert_eq!(products[2].price, None);
    assert_eq!(products[3].price, None);
  }

  #[test]
  fn test_blank_fields_are_missing() {
    let product = Product {
      id: "x".into(),
      name: Some("   ".into()),
      price: Some(Decimal::from(-1)),
      image: Some("".into()),
      category: None,
    };

    assert_eq!(product.display_name(), None);
    assert_eq!(product.display_price(), None);
    assert_eq!(product.display_image(), None);
    assert_eq!(product.display_category(), None);
  }
}
