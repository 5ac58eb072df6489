use serde::Serialize;
use tera::{Context, Tera};

use crate::models::errors::RenderError;

pub const CARD: &str = "card.html";
pub const GRID: &str = "grid.html";
pub const MINI_CART: &str = "mini_cart.html";
pub const LAYOUT: &str = "layout.html";

const CARD_TEMPLATE: &str = r#"<article class="{{ card_class }}" data-product-id="{{ id }}">
  <a href="{{ href }}" class="product-card__link">
    <img src="{{ image }}" alt="{{ name }}" loading="{{ loading }}"{% if priority %} fetchpriority="high"{% endif %} class="product-card__image{% if placeholder_image %} product-card__image--placeholder{% endif %}">
    <h3 class="product-card__name">{{ name }}</h3>
  </a>
  <p class="product-card__price">{{ price }}</p>
  {% if category_badge %}{{ category_badge | safe }}{% endif %}
  <form method="post" action="/cart/add" class="product-card__add">
    <input type="hidden" name="product_id" value="{{ id }}">
    {{ add_button | safe }}
  </form>
</article>"#;

const GRID_TEMPLATE: &str = r#"{% if state == "loading" %}<div class="product-grid product-grid--loading" role="status" aria-busy="true">
  {{ spinner | safe }}
  <span class="sr-only">Loading products</span>
</div>{% elif state == "empty" %}<div class="product-grid product-grid--empty">
  <p class="product-grid__message">{{ empty_message }}</p>
</div>{% else %}<div class="product-grid {{ columns_class }}">
{% for card in cards %}  {{ card | safe }}
{% endfor %}</div>{% endif %}"#;

const MINI_CART_TEMPLATE: &str = r#"<aside class="mini-cart" aria-live="polite">
  <a href="/cart" class="mini-cart__link">
    {% if count == 0 %}<span class="mini-cart__empty">Your cart is empty</span>{% else %}<span class="mini-cart__count">{{ count }} {% if count == 1 %}item{% else %}items{% endif %}</span>
    <span class="mini-cart__subtotal">{{ subtotal }}</span>{% endif %}
  </a>
</aside>"#;

const LAYOUT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} | {{ site_name }}</title>
  {% if description %}<meta name="description" content="{{ description }}">{% endif %}
</head>
<body class="min-h-screen flex flex-col">
  <header class="site-header">
    {{ logo | safe }}
    <nav class="site-nav">
      {% for category in categories %}<a href="/categories/{{ category.slug }}" class="site-nav__link">{{ category.name }}</a>
      {% endfor %}
    </nav>
    <form action="/search" method="get" class="site-search">{{ search | safe }}</form>
    {{ mini_cart | safe }}
  </header>
  <main class="site-main">
{{ content | safe }}
  </main>
  <footer class="site-footer">
    <ul class="site-footer__links">
      {% for link in links %}<li><a href="{{ link.url }}" rel="noopener">{{ link.label }}</a></li>
      {% endfor %}
    </ul>
    <p class="site-footer__copy">&copy; {{ year }} {{ site_name }}</p>
  </footer>
</body>
</html>"#;

/// Compiled storefront templates. Autoescaping is on for every template;
/// fragments rendered elsewhere are passed through `safe`.
#[derive(Debug)]
pub struct Templates {
  tera: Tera,
}

impl Templates {
  pub fn new() -> Result<Self, RenderError> {
    let mut tera = Tera::default();
    tera
      .add_raw_templates(vec![
        (CARD, CARD_TEMPLATE),
        (GRID, GRID_TEMPLATE),
        (MINI_CART, MINI_CART_TEMPLATE),
        (LAYOUT, LAYOUT_TEMPLATE),
      ])
      .map_err(RenderError::Init)?;

    Ok(Self { tera })
  }

  pub fn render<T: Serialize>(&self, template: &'static str, data: &T) -> Result<String, RenderError> {
    let ctx = Context::from_serialize(data).map_err(RenderError::template(template))?;
    self.tera.render(template, &ctx).map_err(RenderError::template(template))
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_templates_compile() {
    assert!(Templates::new().is_ok());
  }

  #[test]
  fn test_values_are_escaped() {
    let templates = Templates::new().unwrap();
    let html = templates
      .render(MINI_CART, &json!({ "count": 2, "subtotal": "<b>$4.00</b>" }))
      .unwrap();

    assert!(html.contains("2 items"));
    assert!(html.contains("&lt;b&gt;$4.00&lt;&#x2F;b&gt;"));
  }

  #[test]
  fn test_unknown_template() {
    let templates = Templates::new().unwrap();
    let err = templates.render("missing.html", &json!({})).unwrap_err();
    assert!(matches!(err, RenderError::Template { template: "missing.html", .. }));
  }
}
