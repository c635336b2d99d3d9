mod analysis;
mod config;
mod documents;
mod errors;
mod llm_client;
mod ranking;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::orchestrator::{Analyzer, KeywordLimits};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::ranking::lexicon::LinguisticResources;
use crate::ranking::KeywordEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobfit API v{}", env!("CARGO_PKG_VERSION"));

    // Load linguistic resources once; a broken lexicon degrades to the basic strategy
    let resources = Arc::new(LinguisticResources::load(config.lexicon_path.as_deref()));
    let engine = KeywordEngine::new(resources).with_idf_policy(config.idf);
    info!("Keyword engine initialized (strategy: {:?})", engine.strategy());

    let limits = KeywordLimits {
        resume: config.resume_top_n,
        job_description: config.job_top_n,
        common: config.common_top_n,
    };
    let analyzer = Arc::new(Analyzer::new(Arc::new(engine), limits));

    // Shared HTTP client for LLM commentary
    let http = LlmClient::http_client()?;
    if config.groq_api_key.is_some() {
        info!("LLM commentary enabled (model: {})", llm_client::MODEL);
    } else {
        info!("No GROQ_API_KEY set; LLM commentary only with per-request keys");
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        analyzer,
        http,
    };

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
