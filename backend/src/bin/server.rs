//! Night sky HTTP server binary.
//!
//! Loads the configuration and the star catalog, builds the engine, and
//! serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin nightsky-server
//!
//! # With the regional geocoder enabled
//! VWORLD_API_KEY=... cargo run --bin nightsky-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `VWORLD_API_KEY`: Regional geocoder key (optional)
//! - `NIGHTSKY_STARS_PATH`, `NIGHTSKY_CONSTELLATIONS_PATH`: Catalog files
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use nightsky_rust::catalog;
use nightsky_rust::config::EngineConfig;
use nightsky_rust::http::{create_router, AppState};
use nightsky_rust::services::SkyEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; library `log` records are forwarded as well
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting night sky HTTP server");

    let config = EngineConfig::load().context("Failed to load configuration")?;

    catalog::init_catalog(&config.catalog).context("Failed to load catalog")?;
    let store = Arc::clone(catalog::get_catalog()?);
    info!(
        stars = store.stars().len(),
        segments = store.segments().len(),
        "Catalog initialized"
    );

    if config.geocoding.regional_key().is_none() {
        info!("VWORLD_API_KEY not set; Korean queries use the global geocoder");
    }
    let engine = SkyEngine::from_config(&config, store)?;

    let state = AppState::new(Arc::new(engine));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
