use serde::Serialize;
use tera::escape_html;

use crate::{
  models::{config::SiteConfig, errors::RenderError, product::Product},
  utils::{money::format_price, net::validate_link, slug::product_slug},
  view::{
    primitives::{
      Badge, BadgeVariant, Button, ButtonType, ButtonVariant, CARD_CLASSES, Size, class_names,
    },
    templates::{CARD, Templates},
  },
};

pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.svg";
pub const PLACEHOLDER_NAME: &str = "Untitled product";
pub const PRICE_UNAVAILABLE: &str = "Price unavailable";

/// One product tile. Holds no state; `priority` comes from the grid.
#[derive(Debug, Clone, Copy)]
pub struct ProductCard<'a> {
  pub product: &'a Product,
  pub priority: bool,
}

#[derive(Debug, Serialize)]
struct CardContext {
  id: String,
  name: String,
  href: String,
  image: String,
  placeholder_image: bool,
  price: String,
  loading: &'static str,
  priority: bool,
  category_badge: String,
  add_button: String,
  card_class: String,
}

impl<'a> ProductCard<'a> {
  pub fn new(product: &'a Product, priority: bool) -> Self {
    Self { product, priority }
  }

  /// `eager` for priority cards, `lazy` for the rest.
  pub fn image_loading(&self) -> &'static str {
    if self.priority { "eager" } else { "lazy" }
  }

  fn context(&self, site: &SiteConfig) -> CardContext {
    let product = self.product;
    let image = product.display_image().filter(|src| validate_link(src).is_ok());

    CardContext {
      id: product.id.to_string(),
      name: product.display_name().unwrap_or(PLACEHOLDER_NAME).to_string(),
      href: format!("/products/{}", product_slug(product.display_name(), &product.id)),
      image: image.unwrap_or(PLACEHOLDER_IMAGE).to_string(),
      placeholder_image: image.is_none(),
      price: product
        .display_price()
        .map(|p| format_price(p, &site.currency_symbol))
        .unwrap_or_else(|| PRICE_UNAVAILABLE.to_string()),
      loading: self.image_loading(),
      priority: self.priority,
      category_badge: product
        .display_category()
        .map(|c| Badge { label: c, variant: BadgeVariant::Secondary }.render())
        .unwrap_or_default(),
      add_button: Button {
        label: "Add to cart",
        variant: ButtonVariant::Primary,
        size: Size::Sm,
        kind: ButtonType::Submit,
        disabled: product.display_price().is_none(),
      }
      .render(),
      card_class: class_names(&[CARD_CLASSES, "product-card"]),
    }
  }

  pub fn render(&self, templates: &Templates, site: &SiteConfig) -> Result<String, RenderError> {
    templates.render(CARD, &self.context(site))
  }

  /// Minimal markup used when the card template itself fails, so the grid
  /// keeps its shape.
  pub fn fallback(&self) -> String {
    format!(
      r#"<article class="{}" data-product-id="{}"><p class="product-card__name">{}</p></article>"#,
      class_names(&[CARD_CLASSES, "product-card", "product-card--degraded"]),
      escape_html(self.product.id.as_str()),
      escape_html(self.product.display_name().unwrap_or(PLACEHOLDER_NAME))
    )
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal::Decimal;

  use super::*;

  fn whey() -> Product {
    Product::new("p1", "Whey Protein", Decimal::new(2990, 2), "/img/whey.png", "Protein")
  }

  #[test]
  fn test_priority_card_loads_eagerly() {
    let templates = Templates::new().unwrap();
    let product = whey();
    let html = ProductCard::new(&product, true).render(&templates, &SiteConfig::default()).unwrap();

    assert!(html.contains(r#"loading="eager""#));
    assert!(html.contains(r#"fetchpriority="high""#));
    assert!(html.contains("Whey Protein"));
    assert!(html.contains("$29.90"));
    assert!(html.contains("&#x2F;products&#x2F;whey-protein-p1"));
    assert!(html.contains("Protein</span>"));
  }

  #[test]
  fn test_regular_card_loads_lazily() {
    let templates = Templates::new().unwrap();
    let product = whey();
    let html =
      ProductCard::new(&product, false).render(&templates, &SiteConfig::default()).unwrap();

    assert!(html.contains(r#"loading="lazy""#));
    assert!(!html.contains("fetchpriority"));
  }

  #[test]
  fn test_malformed_product_degrades() {
    let templates = Templates::new().unwrap();
    let product: Product = serde_json::from_str(r#"{"id": 9, "price": "n/a", "image": "javascript:alert(1)"}"#).unwrap();
    let html = ProductCard::new(&product, false).render(&templates, &SiteConfig::default()).unwrap();

    assert!(html.contains(PLACEHOLDER_NAME));
    assert!(html.contains(PRICE_UNAVAILABLE));
    assert!(html.contains("placeholder.svg"));
    assert!(html.contains("product-card__image--placeholder"));
    assert!(!html.contains("javascript"));
    assert!(html.contains(" disabled>"));
    assert!(!html.contains("rounded-full border px-2.5"));
  }

  #[test]
  fn test_currency_symbol_from_site() {
    let templates = Templates::new().unwrap();
    let site = SiteConfig { currency_symbol: "€".to_string(), ..SiteConfig::default() };
    let product = whey();
    let html = ProductCard::new(&product, false).render(&templates, &site).unwrap();
    assert!(html.contains("€29.90"));
  }

  #[test]
  fn test_fallback_markup() {
    let product = Product { name: Some("<b>Bar</b>".into()), ..whey() };
    let html = ProductCard::new(&product, false).fallback();
    assert!(html.contains("product-card--degraded"));
    assert!(html.contains("&lt;b&gt;Bar"));
  }
}
