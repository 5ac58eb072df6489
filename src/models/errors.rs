use std::error::Error;

use derive_more::Display;

pub type BoxedErr = Box<dyn Error + Send + Sync>;

#[derive(Debug, Display)]
#[display("InternalError: {} {} {} {}", temp, err, msg, path)]
pub struct InternalError {
  pub temp: bool,
  pub err: BoxedErr,
  pub msg: String,
  pub path: String,
}

impl InternalError {
  pub fn new(err: BoxedErr, msg: impl Into<String>, path: impl Into<String>) -> Self {
    Self { temp: false, err, msg: msg.into(), path: path.into() }
  }
}

impl Error for InternalError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(&*self.err)
  }
}

/// Rejections from the cart store. A rejected call never changes the cart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
  #[error("quantity must be a positive integer, got {quantity}")]
  InvalidQuantity { quantity: i64 },
  #[error("quantity {input:?} is not a whole number")]
  MalformedQuantity { input: String },
  #[error("unit price {input:?} is malformed")]
  InvalidPrice { input: String },
  #[error("product id must not be empty")]
  EmptyProductId,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("failed to register templates: {0}")]
  Init(#[source] tera::Error),
  #[error("failed to render {template}: {source}")]
  Template {
    template: &'static str,
    #[source]
    source: tera::Error,
  },
}

impl RenderError {
  pub(crate) fn template(template: &'static str) -> impl FnOnce(tera::Error) -> Self {
    move |source| Self::Template { template, source }
  }
}
