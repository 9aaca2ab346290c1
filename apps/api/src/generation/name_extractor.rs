//! Name extraction: the candidate's first and last name, used to check that a
//! tailored resume keeps the right name.

use serde::Deserialize;
use tracing::warn;

use crate::generation::prompts::{NAME_EXTRACT_PROMPT_TEMPLATE, NAME_EXTRACT_ROLE};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{call_json, LlmBackend};

/// Only the head of the resume is sent; the name is always near the top.
const HEAD_CHARS: usize = 2000;

#[derive(Debug, Default, Deserialize)]
struct ExtractedName {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

/// Returns `(first_name, last_name)`. Never fails: a model error falls back to
/// the first non-empty line of the resume.
pub async fn extract_name(
    resume_text: &str,
    llm: &dyn LlmBackend,
) -> (Option<String>, Option<String>) {
    let head: String = resume_text.chars().take(HEAD_CHARS).collect();
    let prompt = NAME_EXTRACT_PROMPT_TEMPLATE.replace("{resume}", &head);

    match call_json::<ExtractedName>(llm, &prompt, &json_system(NAME_EXTRACT_ROLE)).await {
        Ok(name) => (non_blank(name.first_name), non_blank(name.last_name)),
        Err(e) => {
            warn!("Name extraction failed, using first line heuristic: {e}");
            name_from_first_line(resume_text)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First word of the first non-empty line as first name, the last word as last name.
fn name_from_first_line(resume_text: &str) -> (Option<String>, Option<String>) {
    let Some(line) = resume_text.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return (None, None);
    };
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => (None, None),
        [only] => (Some(only.to_string()), None),
        [first, .., last] => (Some(first.to_string()), Some(last.to_string())),
    }
}
