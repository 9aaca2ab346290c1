mod config;
mod errors;
mod filters;
mod generation;
mod llm_client;
mod models;
mod optimization;
mod routes;
mod runs;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::filters::default_registry;
use crate::generation::LlmResumeGenerator;
use crate::llm_client::embeddings::{Embedder, EmbeddingClient};
use crate::llm_client::{LlmBackend, LlmClient};
use crate::routes::build_router;
use crate::runs::RunStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm: Arc<dyn LlmBackend> = Arc::new(
        LlmClient::new(config.anthropic_api_key.clone(), config.llm_timeout)
            .context("Failed to build LLM client")?,
    );
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Embeddings are optional; without them the vector filter is not registered
    let embedder: Option<Arc<dyn Embedder>> = match &config.embedding {
        Some(embedding) => {
            let client: Arc<dyn Embedder> = Arc::new(EmbeddingClient::new(
                embedding.api_url.clone(),
                embedding.api_key.clone(),
                embedding.model.clone(),
                config.llm_timeout,
            )
            .context("Failed to build embedding client")?);
            info!("Embedding client initialized (model: {})", embedding.model);
            Some(client)
        }
        None => None,
    };

    let registry = default_registry(&config, llm.clone(), embedder)
        .context("Failed to build filter registry")?;

    let generator = Arc::new(LlmResumeGenerator::new(
        llm.clone(),
        config.min_words,
        config.max_words,
    ));

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm,
        registry: Arc::new(registry),
        generator,
        runs: RunStore::new(config.retain_finished_runs),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once a frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
