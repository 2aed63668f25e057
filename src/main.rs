use std::sync::Arc;

use items_api::{Config, Error, ItemStore, Server, items};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    let app = items::router(Arc::new(ItemStore::new()));

    Server::bind(&config.addr)?.serve(app).await
}
