use std::sync::Arc;

use crate::config::Config;
use crate::filters::FilterRegistry;
use crate::generation::ResumeGenerator;
use crate::llm_client::LlmBackend;
use crate::runs::RunStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Used directly for job parsing and name extraction.
    pub llm: Arc<dyn LlmBackend>,
    /// Built once at startup; read-only afterwards.
    pub registry: Arc<FilterRegistry>,
    pub generator: Arc<dyn ResumeGenerator>,
    pub runs: RunStore,
}
