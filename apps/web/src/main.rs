mod api_client;
mod config;
mod errors;
mod mentors;
mod models;
mod normalize;
mod recommendations;
mod roadmap;
mod routes;
mod state;
mod store;
mod survey;
mod trends;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::ApiClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::StateStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Compass web v{}", env!("CARGO_PKG_VERSION"));

    let api = ApiClient::new(&config.api_url, config.api_timeout)?;
    info!(
        "Career service at {} (timeout: {:?})",
        api.base_url(),
        config.api_timeout
    );

    let store = StateStore::open(&config.state_path).await?;

    let state = AppState::new(Arc::new(api), store, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
