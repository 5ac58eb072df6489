use std::error::Error;
use std::sync::Arc;

use crate::models::config::ServiceConfig;
use crate::models::errors::InternalError;
use crate::server::Server;
use crate::store::cart::CartStore;
use crate::store::storage::{FileStorage, FileStorageArgs, KeyValueStore};

impl Server {
  pub(super) fn init_storage(
    &self,
    cfg: &ServiceConfig,
  ) -> Result<Arc<dyn KeyValueStore>, Box<dyn Error>> {
    let storage = FileStorage::new(FileStorageArgs { dir: cfg.cart_dir.clone().into() }).map_err(
      |e| InternalError {
        temp: false,
        err: Box::new(e),
        msg: "failed to open cart storage".into(),
        path: "storefront.server.init_storage".into(),
      },
    )?;

    Ok(Arc::new(storage))
  }

  /// A cart that cannot be read is reported and replaced by an empty one.
  pub(super) async fn restore_cart(&self, storage: &dyn KeyValueStore) -> CartStore {
    match CartStore::restore(storage) {
      Ok(cart) => cart,
      Err(e) => {
        self
          .report(InternalError {
            temp: true,
            err: Box::new(e),
            msg: "failed to restore cart, starting with an empty one".into(),
            path: "storefront.server.restore_cart".into(),
          })
          .await;
        CartStore::new()
      }
    }
  }
}
