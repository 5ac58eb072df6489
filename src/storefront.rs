use std::sync::Arc;

use tracing::debug;

use crate::{
  catalog::CatalogState,
  models::{
    cart::CartSnapshot,
    config::SiteConfig,
    errors::{CartError, RenderError},
    product::Product,
  },
  store::cart::CartStore,
  view::{
    card::PLACEHOLDER_NAME, grid::ProductGrid, layout::LayoutShell, mini_cart::MiniCart,
    templates::Templates,
  },
};

/// Everything one page session renders with: the compiled templates, the
/// site constants, the session's cart and the mini cart bound to it.
#[derive(Debug)]
pub struct Storefront {
  templates: Templates,
  site: SiteConfig,
  cart: CartStore,
  mini_cart: MiniCart,
}

impl Storefront {
  pub fn new(site: SiteConfig, cart: CartStore) -> Result<Self, RenderError> {
    let templates = Templates::new()?;
    let mini_cart = MiniCart::bind(&cart);
    Ok(Self { templates, site, cart, mini_cart })
  }

  pub fn cart(&self) -> &CartStore {
    &self.cart
  }

  pub fn mini_cart(&self) -> &MiniCart {
    &self.mini_cart
  }

  pub fn site(&self) -> &SiteConfig {
    &self.site
  }

  pub fn grid<'a>(&'a self, catalog: &'a CatalogState) -> ProductGrid<'a> {
    let grid = ProductGrid::new(&catalog.products, catalog.is_loading)
      .with_columns(self.site.grid_columns);

    match self.site.empty_message.as_deref() {
      Some(message) => grid.with_empty_message(message),
      None => grid,
    }
  }

  pub fn render_catalog(
    &self,
    title: &str,
    catalog: &CatalogState,
    year: i32,
  ) -> Result<String, RenderError> {
    let grid = self.grid(catalog);
    debug!(state = ?grid.display_state(), products = catalog.products.len(), "rendering catalog");

    let content = grid.render(&self.templates, &self.site)?;
    LayoutShell::new(&self.site, &self.mini_cart, year).render(&self.templates, title, &content)
  }

  /// The add-to-cart action of a product card. Products without a price
  /// cannot be bought.
  pub fn add_to_cart(&self, product: &Product, quantity: u32) -> Result<Arc<CartSnapshot>, CartError> {
    let price = product
      .display_price()
      .ok_or_else(|| CartError::InvalidPrice { input: format!("{:?}", product.price) })?;

    self.cart.add_item(
      product.id.clone(),
      price,
      product.display_name().unwrap_or(PLACEHOLDER_NAME),
      product.display_image().map(str::to_string),
      quantity,
    )
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal::Decimal;

  use super::*;

  #[test]
  fn test_add_to_cart_from_product() {
    let storefront = Storefront::new(SiteConfig::default(), CartStore::new()).unwrap();
    let product = Product::new("p1", "Protein", Decimal::from(10), "/img/p1.png", "Protein");

    storefront.add_to_cart(&product, 1).unwrap();
    let snap = storefront.add_to_cart(&product, 2).unwrap();

    assert_eq!(snap.count(), 3);
    assert_eq!(snap.items()[0].image.as_deref(), Some("/img/p1.png"));
    assert_eq!(storefront.mini_cart().summary().subtotal, Decimal::from(30));
  }

  #[test]
  fn test_unpriced_product_is_rejected() {
    let storefront = Storefront::new(SiteConfig::default(), CartStore::new()).unwrap();
    let product = Product { price: None, ..Product::new("p1", "Gift", Decimal::ZERO, "", "") };

    assert!(matches!(storefront.add_to_cart(&product, 1), Err(CartError::InvalidPrice { .. })));
    assert!(storefront.cart().is_empty());
  }

  #[test]
  fn test_catalog_price_too_large_is_rejected() {
    let storefront = Storefront::new(SiteConfig::default(), CartStore::new()).unwrap();
    let product: Product =
      serde_json::from_str(r#"{"id": "p1", "price": "79228162514264337593543950335"}"#).unwrap();

    assert!(matches!(storefront.add_to_cart(&product, 2), Err(CartError::InvalidPrice { .. })));
    assert!(storefront.cart().is_empty());
    assert_eq!(storefront.mini_cart().summary().count, 0);
  }

  #[test]
  fn test_site_empty_message_reaches_grid() {
    let site = SiteConfig { empty_message: Some("Restocking soon".into()), ..SiteConfig::default() };
    let storefront = Storefront::new(site, CartStore::new()).unwrap();

    let html = storefront.render_catalog("Shop", &CatalogState::loaded(vec![]), 2026).unwrap();
    assert!(html.contains("Restocking soon"));
  }
}
