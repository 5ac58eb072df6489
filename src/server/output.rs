use std::error::Error;
use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::models::errors::InternalError;
use crate::server::Server;

impl Server {
  pub(super) async fn write_page(&self, output: &str, html: &str) -> Result<(), Box<dyn Error>> {
    let mk_err = |msg: &str, e: std::io::Error| InternalError {
      temp: false,
      err: Box::new(e),
      msg: msg.to_string(),
      path: "storefront.server.write_page".into(),
    };

    let output = Path::new(output);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).await.map_err(|e| mk_err("failed to create output directory", e))?;
    }

    fs::write(output, html).await.map_err(|e| mk_err("failed to write page", e))?;
    debug!(output = %output.display(), bytes = html.len(), "page written");
    Ok(())
  }
}
