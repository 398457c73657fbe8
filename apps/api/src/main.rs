mod analysis;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod persistence;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::{OcrConfig, PdfTextExtractor};
use crate::llm_client::build_http_client;
use crate::persistence::{AnalysisSink, DisabledSink, PgAnalysisSink};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unparseable env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Readiness API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Scoring policy: {}, match mode: {:?}",
        config.scoring_policy, config.match_mode
    );

    // Persistence is optional
    let sink: Arc<dyn AnalysisSink> = match &config.database_url {
        Some(url) => Arc::new(PgAnalysisSink::new(create_pool(url).await?)),
        None => {
            info!("DATABASE_URL not set; analyses will not be saved");
            Arc::new(DisabledSink)
        }
    };

    let ocr = config.ocr_enabled.then(|| OcrConfig {
        dpi: config.ocr_dpi,
        lang: config.ocr_lang.clone(),
    });
    info!("OCR fallback {}", if ocr.is_some() { "enabled" } else { "disabled" });
    let extractor = Arc::new(PdfTextExtractor::new(ocr));

    let http = build_http_client(config.llm_timeout_secs).context("Failed to build HTTP client")?;
    info!(
        "LLM feedback model: {} (server credential {})",
        llm_client::MODEL,
        if config.anthropic_api_key.is_some() { "configured" } else { "absent" }
    );

    let state = AppState {
        config: config.clone(),
        extractor,
        sink,
        http,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
