//! Quality filters: independent checks run against every generated candidate.
//!
//! Each filter owns its threshold (from `Config`) and reports a `FilterResult`.
//! Filters are registered once at startup into an immutable `FilterRegistry`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::llm_client::embeddings::Embedder;
use crate::llm_client::{LlmBackend, LlmError};
use crate::models::{FilterResult, JobPosting, OptimizedResume, ResumeSource};

pub mod content_integrity;
pub mod content_length;
pub mod data_validator;
pub mod keyword_matcher;
pub mod llm_checker;
pub mod prompts;
pub mod registry;
pub mod vector_similarity;

pub use content_integrity::ContentIntegrityChecker;
pub use content_length::ContentLengthChecker;
pub use data_validator::DataValidator;
pub use keyword_matcher::KeywordMatcher;
pub use llm_checker::LlmChecker;
pub use registry::{FilterRegistry, RegistryError};
pub use vector_similarity::VectorSimilarityMatcher;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("evaluation panicked")]
    Panicked,

    #[error("{0}")]
    Invalid(String),
}

/// A single quality check.
///
/// `evaluate` may call remote services; it is awaited alongside other filters in
/// parallel mode, so implementations must not block the executor.
#[async_trait]
pub trait Filter: Send + Sync {
    /// Stable identifier, unique within a registry.
    fn name(&self) -> &str;

    /// Lower runs and displays first. Ties keep registration order.
    fn priority(&self) -> i32;

    fn threshold(&self) -> f64;

    async fn evaluate(
        &self,
        candidate: &OptimizedResume,
        job: &JobPosting,
        source: &ResumeSource,
    ) -> Result<FilterResult, FilterError>;
}

/// Registers the standard filter set. The vector-similarity filter is only
/// registered when an embedding backend is available.
pub fn default_registry(
    config: &Config,
    llm: Arc<dyn LlmBackend>,
    embedder: Option<Arc<dyn Embedder>>,
) -> Result<FilterRegistry, RegistryError> {
    let thresholds = &config.thresholds;
    let mut builder = FilterRegistry::builder();

    builder.register(Arc::new(ContentLengthChecker::new(
        config.min_words,
        config.max_words,
    )))?;
    builder.register(Arc::new(DataValidator::new()))?;
    builder.register(Arc::new(ContentIntegrityChecker::new(
        llm.clone(),
        thresholds.faithfulness,
        thresholds.ai_generated,
    )))?;
    builder.register(Arc::new(KeywordMatcher::new(thresholds.keyword)))?;
    builder.register(Arc::new(LlmChecker::new(llm, thresholds.llm_quality)))?;

    match embedder {
        Some(embedder) => {
            builder.register(Arc::new(VectorSimilarityMatcher::new(
                embedder,
                thresholds.vector_similarity,
            )))?;
        }
        None => warn!("No embedding backend configured; VectorSimilarityMatcher disabled"),
    }

    let registry = builder.build();
    info!(
        "Filter registry ready: [{}]",
        registry
            .filters()
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(registry)
}
