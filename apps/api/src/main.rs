mod applications;
mod auth;
mod builder;
mod config;
mod errors;
mod export;
mod layout;
mod models;
mod routes;
mod state;
mod templates;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::applications::ApplicationClient;
use crate::auth::RemoteAuthenticator;
use crate::builder::SessionRegistry;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing required env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting InternHub API v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client shared by both remote collaborators
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;
    info!("Remote API: {}", config.api_base_url);

    let state = AppState {
        sessions: SessionRegistry::new(config.session_limit, config.session_ttl()),
        auth: Arc::new(RemoteAuthenticator::new(
            http.clone(),
            config.api_base_url.clone(),
        )),
        applications: ApplicationClient::new(http, config.api_base_url.clone()),
        config: config.clone(),
    };

    state.sessions.spawn_reaper(config.session_ttl() / 4);
    info!(
        ttl_minutes = config.session_ttl_minutes,
        "Idle builder sessions will be evicted"
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web frontend

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
