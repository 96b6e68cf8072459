use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod format;
mod models;
mod query;
mod render;
mod server;

use api::ApiClient;
use config::AppConfig;
use server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting PoE uniques browser");

    // Missing API_BASE_URL stops the process here, before anything is served.
    let config = AppConfig::from_env()?;
    let client = ApiClient::new(&config)?;

    let (_, capacity) = client.cache().stats();
    if client.cache().is_enabled() {
        info!(
            "Response cache enabled: ttl={}s, capacity={}",
            config.cache_ttl.as_secs(),
            capacity
        );
    } else {
        info!("Response cache disabled");
    }
    info!("Uniques API: {}", client.base_url());

    let state = Arc::new(AppState {
        source: Arc::new(client),
    });

    server::serve(&config.bind_addr, state).await
}
