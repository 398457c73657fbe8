use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::extraction::PdfTextExtractor;
use crate::persistence::AnalysisSink;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; nothing about a user's analysis is kept here.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: Arc<PdfTextExtractor>,
    /// Pluggable persistence. `DisabledSink` when no database is configured.
    pub sink: Arc<dyn AnalysisSink>,
    /// Shared HTTP client for delegated feedback calls.
    pub http: Client,
}
