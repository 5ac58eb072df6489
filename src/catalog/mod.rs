use std::{future::Future, path::PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{errors::InternalError, product::Product};

/// Where catalog pages get their products from. Implementations resolve the
/// whole list; the grid only ever sees the finished result.
pub trait CatalogSource: Send + Sync {
  fn products(&self) -> impl Future<Output = Result<Vec<Product>, InternalError>> + Send;
}

/// What a catalog page hands to the product grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
  pub is_loading: bool,
  pub products: Vec<Product>,
}

impl CatalogState {
  pub fn loading() -> Self {
    Self { is_loading: true, products: vec![] }
  }

  pub fn loaded(products: Vec<Product>) -> Self {
    Self { is_loading: false, products }
  }

  /// Fetches from `source`. A failed fetch ends as an empty, loaded catalog
  /// and the error is returned alongside for reporting.
  pub async fn fetch<S: CatalogSource>(source: &S) -> (Self, Option<InternalError>) {
    match source.products().await {
      Ok(products) => (Self::loaded(products), None),
      Err(err) => (Self::loaded(vec![]), Some(err)),
    }
  }
}

/// JSON array of product records on disk.
#[derive(Debug, Clone)]
pub struct FileCatalog {
  path: PathBuf,
}

impl FileCatalog {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }
}

impl CatalogSource for FileCatalog {
  async fn products(&self) -> Result<Vec<Product>, InternalError> {
    let path = "storefront.catalog.file_catalog.products";
    let json = tokio::fs::read_to_string(&self.path).await.map_err(|err| {
      InternalError::new(
        Box::new(err),
        format!("failed to read catalog {}", self.path.display()),
        path,
      )
    })?;

    parse_products(&json).map_err(|err| InternalError::new(Box::new(err), "catalog is not a json array", path))
  }
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
  products: Vec<Product>,
}

impl StaticCatalog {
  pub fn new(products: Vec<Product>) -> Self {
    Self { products }
  }
}

impl CatalogSource for StaticCatalog {
  async fn products(&self) -> Result<Vec<Product>, InternalError> {
    Ok(self.products.clone())
  }
}

/// Parses a catalog payload record by record. Records without a usable id
/// are skipped; everything else is kept, however incomplete.
pub fn parse_products(json: &str) -> Result<Vec<Product>, serde_json::Error> {
  let records: Vec<Value> = serde_json::from_str(json)?;
  let total = records.len();

  let products: Vec<Product> = records
    .into_iter()
    .enumerate()
    .filter_map(|(i, record)| match serde_json::from_value::<Product>(record) {
      Ok(product) if !product.id.is_empty() => Some(product),
      Ok(_) => {
        warn!(index = i, "skipping catalog record with blank id");
        None
      }
      Err(err) => {
        warn!(index = i, %err, "skipping malformed catalog record");
        None
      }
    })
    .collect();

  debug!(total, kept = products.len(), "catalog parsed");
  Ok(products)
}

#[cfg(test)]
mod tests {
  use rust_decimal::Decimal;

  use super::*;

  #[test]
  fn test_parse_skips_records_without_id() {
    let products = parse_products(
      r#"[
        {"id": "p1", "name": "Whey", "price": 29.9},
        {"name": "No id"},
        {"id": "  "},
        {"id": 3, "name": null}
      ]"#,
    )
    .unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price, Some(Decimal::new(299, 1)));
    assert_eq!(products[1].id.as_str(), "3");
    assert_eq!(products[1].display_name(), None);
  }

  #[test]
  fn test_parse_rejects_non_array() {
    assert!(parse_products(r#"{"id": "p1"}"#).is_err());
  }

  #[tokio::test]
  async fn test_file_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("catalog.json");
    std::fs::write(&file, r#"[{"id": "p1", "name": "Whey"}]"#).unwrap();

    let products = FileCatalog::new(&file).products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].display_name(), Some("Whey"));
  }

  #[tokio::test]
  async fn test_failed_fetch_is_empty_and_loaded() {
    let (state, err) = CatalogState::fetch(&FileCatalog::new("missing/catalog.json")).await;
    assert!(!state.is_loading);
    assert!(state.products.is_empty());
    assert_eq!(err.map(|e| e.path), Some("storefront.catalog.file_catalog.products".to_string()));
  }

  #[tokio::test]
  async fn test_static_catalog() {
    let source = StaticCatalog::new(vec![Product::new("p1", "Bar", Decimal::ONE, "/b.png", "Snacks")]);
    let (state, err) = CatalogState::fetch(&source).await;
    assert!(err.is_none());
    assert_eq!(state.products.len(), 1);
    assert!(CatalogState::loading().is_loading);
  }
}
