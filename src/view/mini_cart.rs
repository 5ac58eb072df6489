use std::sync::{Arc, PoisonError, RwLock};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::{
  models::{cart::CartSnapshot, config::SiteConfig, errors::RenderError},
  store::cart::{CartStore, Subscription},
  utils::money::format_price,
  view::templates::{MINI_CART, Templates},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiniCartSummary {
  pub count: u64,
  pub subtotal: Decimal,
}

#[derive(Debug, Serialize)]
struct MiniCartContext {
  count: u64,
  subtotal: String,
}

/// Header cart summary. Keeps the last snapshot the store pushed to it and
/// never adds anything up itself.
#[derive(Debug)]
pub struct MiniCart {
  latest: Arc<RwLock<Arc<CartSnapshot>>>,
  subscription: Option<Subscription>,
}

impl MiniCart {
  pub fn bind(store: &CartStore) -> Self {
    let latest = Arc::new(RwLock::new(store.snapshot()));

    let subscription = {
      let latest = latest.clone();
      store.subscribe(move |snapshot| {
        let mut latest = latest.write().unwrap_or_else(PoisonError::into_inner);
        // Concurrent writers may notify out of order; keep the newest.
        if snapshot.version() > latest.version() {
          debug!(count = snapshot.count(), version = snapshot.version(), "mini cart refreshed");
          *latest = snapshot.clone();
        }
      })
    };

    Self { latest, subscription: Some(subscription) }
  }

  pub fn snapshot(&self) -> Arc<CartSnapshot> {
    self.latest.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn summary(&self) -> MiniCartSummary {
    let snapshot = self.snapshot();
    MiniCartSummary { count: snapshot.count(), subtotal: snapshot.subtotal() }
  }

  pub fn render(&self, templates: &Templates, site: &SiteConfig) -> Result<String, RenderError> {
    let summary = self.summary();
    let ctx = MiniCartContext {
      count: summary.count,
      subtotal: format_price(summary.subtotal, &site.currency_symbol),
    };

    templates.render(MINI_CART, &ctx)
  }

  /// Stops following the store; the last summary stays readable.
  pub fn unbind(&mut self) {
    if let Some(subscription) = self.subscription.take() {
      subscription.unsubscribe();
    }
  }
}

impl Drop for MiniCart {
  fn drop(&mut self) {
    self.unbind();
  }
}
