//! Resume Generation: the content-generation step driven by the refinement loop.
//!
//! Flow per call: build prompt (job + original + optional feedback) → LLM → `ResumeData`
//! → fresh `OptimizedResume`. Feedback is the previous iteration's `ValidationResult`
//! only; older verdicts are never replayed.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::generation::prompts::{
    FEEDBACK_TEMPLATE, GENERATION_PROMPT_TEMPLATE, GENERATION_ROLE,
};
use crate::llm_client::prompts::{json_system, GROUNDING_INSTRUCTION};
use crate::llm_client::{call_json, LlmBackend, LlmError};
use crate::models::resume::ResumeData;
use crate::models::{JobPosting, OptimizedResume, ResumeSource, ValidationResult};

/// Max extra LLM attempts when the model returns output that is not a resume.
const MAX_GENERATION_RETRIES: u32 = 2;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("generation failed after {attempts} attempts: {reason}")]
    Exhausted { attempts: u32, reason: String },

    #[error("failed to build generation prompt: {0}")]
    Prompt(#[from] serde_json::Error),
}

/// Produces a candidate resume. `feedback` is `None` on the first call and the
/// previous iteration's verdict afterwards.
#[async_trait]
pub trait ResumeGenerator: Send + Sync {
    async fn generate(
        &self,
        source: &ResumeSource,
        job: &JobPosting,
        feedback: Option<&ValidationResult>,
    ) -> Result<OptimizedResume, GenerationError>;
}

/// LLM-backed generator producing structured resume data.
pub struct LlmResumeGenerator {
    llm: Arc<dyn LlmBackend>,
    min_words: usize,
    max_words: usize,
}

impl LlmResumeGenerator {
    pub fn new(llm: Arc<dyn LlmBackend>, min_words: usize, max_words: usize) -> Self {
        Self {
            llm,
            min_words,
            max_words,
        }
    }

    fn build_prompt(
        &self,
        source: &ResumeSource,
        job: &JobPosting,
        feedback: Option<&ValidationResult>,
    ) -> Result<String, GenerationError> {
        let job_json = serde_json::to_string_pretty(&serde_json::json!({
            "title": job.title,
            "company": job.company,
            "location": job.location,
            "requirements": job.requirements,
            "responsibilities": job.responsibilities,
            "keywords": job.keywords,
            "description": job.description,
        }))?;

        let feedback_block = feedback.map(format_feedback).unwrap_or_default();

        Ok(GENERATION_PROMPT_TEMPLATE
            .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
            .replace("{job_json}", &job_json)
            .replace("{original}", &source.content)
            .replace("{feedback}", &feedback_block)
            .replace("{min_words}", &self.min_words.to_string())
            .replace("{max_words}", &self.max_words.to_string()))
    }
}

#[async_trait]
impl ResumeGenerator for LlmResumeGenerator {
    async fn generate(
        &self,
        source: &ResumeSource,
        job: &JobPosting,
        feedback: Option<&ValidationResult>,
    ) -> Result<OptimizedResume, GenerationError> {
        let prompt = self.build_prompt(source, job, feedback)?;
        let system = json_system(GENERATION_ROLE);

        let mut last_reason = String::new();
        for attempt in 0..=MAX_GENERATION_RETRIES {
            match call_json::<ResumeData>(self.llm.as_ref(), &prompt, &system).await {
                Ok(data) => return Ok(OptimizedResume::from_data(data, 0)),
                // Malformed output is worth another attempt; transport and API errors are not.
                Err(e @ (LlmError::Parse(_) | LlmError::EmptyContent)) => {
                    warn!(
                        "Generation attempt {}/{} returned unusable output: {}",
                        attempt + 1,
                        MAX_GENERATION_RETRIES + 1,
                        e
                    );
                    last_reason = e.to_string();
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(GenerationError::Exhausted {
            attempts: MAX_GENERATION_RETRIES + 1,
            reason: last_reason,
        })
    }
}

/// Renders the failing filters of a verdict as corrective instructions.
pub fn format_feedback(verdict: &ValidationResult) -> String {
    let failures = verdict
        .failing()
        .map(|r| {
            let mut block = format!(
                "- [{}] score {:.2}, needs {:.2}",
                r.filter_name(),
                r.score(),
                r.threshold()
            );
            for issue in r.issues() {
                block.push_str(&format!("\n    Issue: {issue}"));
            }
            for suggestion in r.suggestions() {
                block.push_str(&format!("\n    Fix: {suggestion}"));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n");

    let passed = verdict
        .passing()
        .map(|r| r.filter_name())
        .collect::<Vec<_>>();
    let passed = if passed.is_empty() {
        "(none)".to_string()
    } else {
        passed.join(", ")
    };

    FEEDBACK_TEMPLATE
        .replace("{failures}", &failures)
        .replace("{passed}", &passed)
}
