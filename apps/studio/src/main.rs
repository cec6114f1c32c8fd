mod client;
mod config;
mod dashboard;
mod errors;
mod models;
mod proxy;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::client::StudioClient;
use crate::config::Config;
use crate::dashboard::InMemorySettingsStore;
use crate::routes::build_router;
use crate::state::AppState;

/// Upper bound for one buffered upstream call. Video kickoff can be slow.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Content Studio v{}", env!("CARGO_PKG_VERSION"));

    for (key, value) in [
        ("OPENAI_API_KEY", &config.openai_api_key),
        ("RUNWAY_API_KEY", &config.runway_api_key),
    ] {
        if value.is_none() {
            warn!("{key} is not set; its proxy routes will answer 500 until it is");
        }
    }

    let http = reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let studio = StudioClient::new(http.clone(), config.proxy_base_url.clone());
    info!("Dashboard reaches the proxy at {}", studio.base_url());

    let state = AppState {
        config: config.clone(),
        http,
        studio,
        settings: Arc::new(InMemorySettingsStore::default()),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr} (CORS origin: {})", config.public_app_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
