mod output;
mod storage;

use std::error::Error;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use tokio::spawn;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, Receiver};
use tracing::{error, info};

use crate::catalog::{CatalogState, FileCatalog};
use crate::models::config::Config;
use crate::models::errors::{BoxedErr, InternalError};
use crate::storefront::Storefront;

pub struct Server {
  pub(crate) errors: mpsc::Sender<InternalError>,
  pub(crate) config: Arc<Mutex<Config>>,
}

#[derive(Debug)]
pub struct ServerArgs {
  pub config: Config,
}

impl Server {
  pub async fn new(args: ServerArgs) -> Result<Self, Box<dyn Error>> {
    let (tx, rx) = mpsc::channel::<InternalError>(100);

    let server = Self { errors: tx, config: Arc::new(Mutex::new(args.config)) };

    let err_rx = rx;
    spawn(async move {
      Server::errors_listener(err_rx).await;
    });

    Ok(server)
  }

  /// Renders the catalog page once: restores the session cart, fetches the
  /// catalog, writes the page and saves the cart back.
  pub async fn run(&mut self) -> Result<(), Box<dyn Error>> {
    let mk_err = |msg: &str, e: BoxedErr| InternalError {
      temp: false,
      err: e,
      msg: msg.to_string(),
      path: "storefront.server.run".into(),
    };

    let cfg = self.config.lock().await.clone();

    let storage = self.init_storage(&cfg.service)?;
    let cart = self.restore_cart(storage.as_ref()).await;
    let persist = cart.persist_to(storage.clone());

    let storefront = Storefront::new(cfg.site.clone(), cart.clone())
      .map_err(|e| mk_err("failed to initialize templates", Box::new(e)))?;

    let source = FileCatalog::new(&cfg.service.catalog_path);
    let (catalog, fetch_err) = CatalogState::fetch(&source).await;
    if let Some(err) = fetch_err {
      self.report(err).await;
    }

    let page = storefront
      .render_catalog("Catalog", &catalog, Utc::now().year())
      .map_err(|e| mk_err("failed to render catalog page", Box::new(e)))?;
    self.write_page(&cfg.service.output_path, &page).await?;

    persist.unsubscribe();
    cart.save(storage.as_ref()).map_err(|e| mk_err("failed to save cart", Box::new(e)))?;

    info!(
      env = %cfg.service.env,
      products = catalog.products.len(),
      cart_items = storefront.mini_cart().summary().count,
      output = %cfg.service.output_path,
      "storefront rendered"
    );
    Ok(())
  }

  pub(crate) async fn report(&self, err: InternalError) {
    if let Err(send_err) = self.errors.send(err).await {
      error!(err = %send_err.0, "errors listener is gone");
    }
  }

  async fn errors_listener(mut receiver: Receiver<InternalError>) {
    while let Some(msg) = receiver.recv().await {
      error!(path = %msg.path, temp = msg.temp, "{}", msg)
    }
  }
}
