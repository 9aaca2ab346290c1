//! Job Parser: turns raw posting text into a `JobPosting`.
//!
//! The model is told to extract names verbatim, but it still occasionally "helpfully"
//! fills in an employer from world knowledge. Extracted company and title are therefore
//! checked against the posting text: an ungrounded company becomes `"Unknown"`, an
//! ungrounded title is kept and logged.

use tracing::{info, warn};

use crate::filters::keyword_matcher::contains_keyword;
use crate::generation::generator::GenerationError;
use crate::generation::prompts::{JOB_PARSE_PROMPT_TEMPLATE, JOB_PARSE_ROLE};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{call_json, LlmBackend};
use crate::models::JobPosting;

pub const UNKNOWN_COMPANY: &str = "Unknown";

/// Parses a job posting using the LLM and grounds the extracted names in `text`.
pub async fn parse_job_posting(
    text: &str,
    llm: &dyn LlmBackend,
) -> Result<JobPosting, GenerationError> {
    let prompt = JOB_PARSE_PROMPT_TEMPLATE.replace("{job_text}", text);
    let mut job: JobPosting = call_json(llm, &prompt, &json_system(JOB_PARSE_ROLE)).await?;

    let mut warnings = Vec::new();
    if !is_grounded(&job.company, text) {
        warnings.push(format!("company '{}' not found in posting text", job.company));
        job.company = UNKNOWN_COMPANY.to_string();
    }
    if !is_grounded(&job.title, text) {
        warnings.push(format!("title '{}' not found in posting text", job.title));
    }
    if !warnings.is_empty() {
        warn!("Job parser grounding issues: {}", warnings.join("; "));
    }

    job.raw_text = text.to_string();
    info!(
        "Parsed job posting: {} at {} ({} keywords)",
        job.title,
        job.company,
        job.keywords.len()
    );
    Ok(job)
}

/// True when `value` appears in `text`, either as a whole or as separate whole words
/// (case-insensitive). Blank values and the "Unknown" marker are always grounded.
pub fn is_grounded(value: &str, text: &str) -> bool {
    let value = value.trim().to_lowercase();
    if value.is_empty() || value == UNKNOWN_COMPANY.to_lowercase() {
        return true;
    }
    let text = text.to_lowercase();
    contains_keyword(&text, &value)
        || value
            .split_whitespace()
            .all(|word| contains_keyword(&text, word))
}
