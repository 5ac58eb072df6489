use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
  models::{config::SiteConfig, errors::RenderError, product::Product},
  view::{
    card::ProductCard,
    primitives::{Size, Spinner},
    templates::{GRID, Templates},
  },
};

/// Number of leading cards whose images load eagerly, whatever the column
/// count.
pub const PRIORITY_CUTOFF: usize = 4;

pub const DEFAULT_EMPTY_MESSAGE: &str = "No products found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
  Loading,
  Empty,
  Populated,
}

impl DisplayState {
  /// Loading wins over everything, then an empty list.
  pub fn select(is_loading: bool, product_count: usize) -> Self {
    if is_loading {
      DisplayState::Loading
    } else if product_count == 0 {
      DisplayState::Empty
    } else {
      DisplayState::Populated
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum GridColumns {
  Two,
  Three,
  #[default]
  Four,
}

impl TryFrom<u8> for GridColumns {
  type Error = String;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      2 => Ok(GridColumns::Two),
      3 => Ok(GridColumns::Three),
      4 => Ok(GridColumns::Four),
      n => Err(format!("grid columns must be 2, 3 or 4, got {}", n)),
    }
  }
}

impl GridColumns {
  pub fn count(self) -> u8 {
    match self {
      GridColumns::Two => 2,
      GridColumns::Three => 3,
      GridColumns::Four => 4,
    }
  }

  pub fn classes(self) -> &'static str {
    match self {
      GridColumns::Two => "grid grid-cols-1 gap-6 sm:grid-cols-2",
      GridColumns::Three => "grid grid-cols-1 gap-6 sm:grid-cols-2 lg:grid-cols-3",
      GridColumns::Four => "grid grid-cols-1 gap-6 sm:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4",
    }
  }
}

pub fn is_priority(index: usize) -> bool {
  index < PRIORITY_CUTOFF
}

#[derive(Debug, Clone, Copy)]
pub struct ProductGrid<'a> {
  pub products: &'a [Product],
  pub is_loading: bool,
  pub columns: GridColumns,
  pub empty_message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct GridContext<'a> {
  state: DisplayState,
  spinner: String,
  empty_message: &'a str,
  columns_class: &'static str,
  cards: Vec<String>,
}

impl<'a> ProductGrid<'a> {
  pub fn new(products: &'a [Product], is_loading: bool) -> Self {
    Self { products, is_loading, columns: GridColumns::default(), empty_message: None }
  }

  pub fn with_columns(mut self, columns: GridColumns) -> Self {
    self.columns = columns;
    self
  }

  pub fn with_empty_message(mut self, message: &'a str) -> Self {
    self.empty_message = Some(message);
    self
  }

  pub fn display_state(&self) -> DisplayState {
    DisplayState::select(self.is_loading, self.products.len())
  }

  /// Cards in sequence order, each with its priority hint.
  pub fn cards(&self) -> Vec<ProductCard<'a>> {
    self.products.iter().enumerate().map(|(i, p)| ProductCard::new(p, is_priority(i))).collect()
  }

  pub fn render(&self, templates: &Templates, site: &SiteConfig) -> Result<String, RenderError> {
    let state = self.display_state();

    // A card that fails renders its fallback instead of taking the grid down.
    let cards = match state {
      DisplayState::Populated => self
        .cards()
        .iter()
        .map(|card| {
          card.render(templates, site).unwrap_or_else(|err| {
            warn!(product_id = %card.product.id, %err, "product card degraded");
            card.fallback()
          })
        })
        .collect(),
      _ => vec![],
    };

    let ctx = GridContext {
      state,
      spinner: Spinner { size: Size::Lg }.render(),
      empty_message: self.empty_message.unwrap_or(DEFAULT_EMPTY_MESSAGE),
      columns_class: self.columns.classes(),
      cards,
    };

    templates.render(GRID, &ctx)
  }
}
