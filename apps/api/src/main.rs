mod config;
mod documents;
mod errors;
mod llm_client;
mod routes;
mod session;
mod state;
mod tailoring;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::documents::Documents;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Job Application Assistant v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load the base cover letter and resume
    let documents = Documents::load(
        config.cover_letter_path.as_deref(),
        config.resume_path.as_deref(),
    )?;

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        &config.openai_base_url,
        config.llm_timeout,
        config.llm_max_retries,
    )
    .context("Failed to build completion HTTP client")?
    .with_backoff(config.llm_retry_backoff);
    info!(
        "LLM client initialized (model: {}, endpoint: {}, timeout: {:?}, retries: {})",
        llm_client::MODEL,
        llm.endpoint(),
        config.llm_timeout,
        config.llm_max_retries
    );

    // Build app state
    let state = AppState::new(Arc::new(llm), documents)?;

    spawn_session_eviction(state.sessions.clone(), config.session_ttl);

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drops sessions that have been idle longer than `ttl`.
fn spawn_session_eviction(sessions: SessionStore, ttl: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(EVICTION_INTERVAL);
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_idle(ttl).await;
            if evicted > 0 {
                debug!("Evicted {evicted} idle sessions");
            }
        }
    });
}
