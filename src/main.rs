use std::{env, error::Error};

use megacommerce_storefront::{
  models::config::Config,
  server::{Server, ServerArgs},
};
use tracing::warn;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
  let config_path = env::var("STOREFRONT_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
  let (config, load_err) = match Config::from_file(&config_path) {
    Ok(cfg) => (cfg, None),
    Err(err) => (Config::default(), Some(err)),
  };

  let subscriber = FmtSubscriber::builder().with_max_level(config.service.level()).finish();
  tracing::subscriber::set_global_default(subscriber).expect("failed to set logger");

  if let Some(err) = load_err {
    warn!(%err, path = %config_path, "using default config");
  }

  let args = ServerArgs { config };

  let server = Server::new(args).await;
  match server {
    Ok(mut srv) => srv.run().await,
    Err(e) => Err(e),
  }
}
