use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::{models::errors::InternalError, view::grid::GridColumns};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub service: ServiceConfig,
  #[serde(default)]
  pub site: SiteConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
  pub env: String,
  pub log_level: String,
  pub catalog_path: String,
  pub cart_dir: String,
  pub output_path: String,
}

/// Site-wide constants read by the presentation layer.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
  pub name: String,
  pub description: String,
  pub currency_symbol: String,
  pub categories: Vec<SiteCategory>,
  pub links: Vec<SiteLink>,
  pub grid_columns: GridColumns,
  pub empty_message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCategory {
  pub slug: String,
  pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLink {
  pub label: String,
  pub url: String,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    ServiceConfig {
      env: "local".to_string(),
      log_level: "debug".to_string(),
      catalog_path: "demos/catalog.json".to_string(),
      cart_dir: ".storefront".to_string(),
      output_path: "public/index.html".to_string(),
    }
  }
}

impl Default for SiteConfig {
  fn default() -> Self {
    SiteConfig {
      name: "Megacommerce".to_string(),
      description: "".to_string(),
      currency_symbol: "$".to_string(),
      categories: vec![],
      links: vec![],
      grid_columns: GridColumns::default(),
      empty_message: None,
    }
  }
}

impl ServiceConfig {
  /// Unknown levels fall back to DEBUG.
  pub fn level(&self) -> Level {
    self.log_level.parse::<Level>().unwrap_or(Level::DEBUG)
  }
}

impl Config {
  pub fn from_file(path: impl AsRef<Path>) -> Result<Config, InternalError> {
    let path = path.as_ref();
    let yaml_string = fs::read_to_string(path).map_err(|err| {
      InternalError::new(
        Box::new(err),
        format!("failed to load service config file {}", path.display()),
        "storefront.config.from_file",
      )
    })?;

    Config::from_yaml(&yaml_string)
  }

  pub fn from_yaml(yaml: &str) -> Result<Config, InternalError> {
    serde_yaml::from_str(yaml).map_err(|err| {
      InternalError::new(Box::new(err), "failed to parse config data", "storefront.config.from_yaml")
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_full_config() {
    let cfg = Config::from_yaml(
      r#"
service:
  env: production
  log_level: warn
  catalog_path: data/catalog.json
site:
  name: Iron Pantry
  currency_symbol: "€"
  grid_columns: 3
  categories:
    - { slug: protein, name: Protein }
  links:
    - { label: Instagram, url: "https://instagram.com/ironpantry" }
"#,
    )
    .unwrap();

    assert_eq!(cfg.service.env, "production");
    assert_eq!(cfg.service.level(), Level::WARN);
    assert_eq!(cfg.service.output_path, "public/index.html");
    assert_eq!(cfg.site.name, "Iron Pantry");
    assert_eq!(cfg.site.grid_columns, GridColumns::Three);
    assert_eq!(cfg.site.categories[0].slug, "protein");
    assert_eq!(cfg.site.links.len(), 1);
  }

  #[test]
  fn test_empty_config_uses_defaults() {
    let cfg = Config::from_yaml("{}").unwrap();
    assert_eq!(cfg.site.grid_columns, GridColumns::Four);
    assert_eq!(cfg.site.currency_symbol, "$");
    assert_eq!(cfg.service.level(), Level::DEBUG);
  }

  #[test]
  fn test_rejects_unsupported_column_count() {
    assert!(Config::from_yaml("site:\n  grid_columns: 5\n").is_err());
  }

  #[test]
  fn test_missing_file() {
    let err = Config::from_file("does/not/exist.yaml").unwrap_err();
    assert_eq!(err.path, "storefront.config.from_file");
  }
}
