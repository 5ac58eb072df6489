use serde::Serialize;
use tracing::warn;

use crate::{
  models::{
    config::{SiteCategory, SiteConfig, SiteLink},
    errors::RenderError,
  },
  utils::net::validate_link,
  view::{
    mini_cart::MiniCart,
    primitives::{Input, InputType, Logo},
    templates::{LAYOUT, Templates},
  },
};

/// Page frame shared by every storefront page: header with logo, category
/// navigation, search and mini cart, then content, then footer.
#[derive(Debug)]
pub struct LayoutShell<'a> {
  pub site: &'a SiteConfig,
  pub mini_cart: &'a MiniCart,
  pub year: i32,
}

#[derive(Debug, Serialize)]
struct LayoutContext<'a> {
  title: &'a str,
  site_name: &'a str,
  description: &'a str,
  logo: String,
  search: String,
  categories: &'a [SiteCategory],
  links: Vec<&'a SiteLink>,
  mini_cart: String,
  content: &'a str,
  year: i32,
}

impl<'a> LayoutShell<'a> {
  pub fn new(site: &'a SiteConfig, mini_cart: &'a MiniCart, year: i32) -> Self {
    Self { site, mini_cart, year }
  }

  /// Links that fail validation are left out of the footer.
  fn links(&self) -> Vec<&'a SiteLink> {
    self
      .site
      .links
      .iter()
      .filter(|link| match validate_link(&link.url) {
        Ok(_) => true,
        Err(err) => {
          warn!(label = %link.label, url = %link.url, %err, "skipping site link");
          false
        }
      })
      .collect()
  }

  pub fn render(
    &self,
    templates: &Templates,
    title: &str,
    content: &str,
  ) -> Result<String, RenderError> {
    let ctx = LayoutContext {
      title,
      site_name: &self.site.name,
      description: &self.site.description,
      logo: Logo { site_name: &self.site.name, href: "/" }.render(),
      search: Input {
        name: "q",
        kind: InputType::Search,
        placeholder: Some("Search products"),
        value: None,
      }
      .render(),
      categories: &self.site.categories,
      links: self.links(),
      mini_cart: self.mini_cart.render(templates, self.site)?,
      content,
      year: self.year,
    };

    templates.render(LAYOUT, &ctx)
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal::Decimal;

  use super::*;
  use crate::store::cart::CartStore;

  fn site() -> SiteConfig {
    SiteConfig {
      name: "Iron Pantry".to_string(),
      description: "Supplements & snacks".to_string(),
      categories: vec![SiteCategory { slug: "protein".into(), name: "Protein".into() }],
      links: vec![
        SiteLink { label: "Instagram".into(), url: "https://instagram.com/ironpantry".into() },
        SiteLink { label: "Broken".into(), url: "not a link".into() },
      ],
      ..SiteConfig::default()
    }
  }

  #[test]
  fn test_shell_composes_page() {
    let templates = Templates::new().unwrap();
    let site = site();
    let store = CartStore::new();
    let mini = MiniCart::bind(&store);
    store.add_item("p1", Decimal::from(5), "Bar", None, 2).unwrap();

    let html = LayoutShell::new(&site, &mini, 2026)
      .render(&templates, "Catalog", "<section id=\"catalog\"></section>")
      .unwrap();

    assert!(html.contains("<title>Catalog | Iron Pantry</title>"));
    assert!(html.contains("Supplements &amp; snacks"));
    assert!(html.contains("site-logo"));
    assert!(html.contains(r#"type="search" name="q""#));
    assert!(html.contains(r#"href="/categories/protein""#));
    assert!(html.contains("<section id=\"catalog\"></section>"));
    assert!(html.contains("2 items"));
    assert!(html.contains("$10.00"));
    assert!(html.contains("Instagram"));
    assert!(!html.contains("Broken"));
    assert!(html.contains("&copy; 2026 Iron Pantry"));
  }
}
