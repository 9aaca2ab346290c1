//! LLM Checker: holistic recruiter-style review by a generative model.
//!
//! Scores vary slightly between identical inputs; the loop tolerates that because
//! each iteration is judged on its own.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::prompts::{LLM_CHECK_PROMPT_TEMPLATE, LLM_CHECK_ROLE};
use super::{Filter, FilterError};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{call_json, LlmBackend};
use crate::models::{FilterResult, JobPosting, OptimizedResume, ResumeSource};

pub const NAME: &str = "LLMChecker";
const PRIORITY: i32 = 4;

#[derive(Debug, Deserialize)]
struct QualityReview {
    score: f64,
    #[serde(default)]
    issues: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

pub struct LlmChecker {
    llm: Arc<dyn LlmBackend>,
    threshold: f64,
}

impl LlmChecker {
    pub fn new(llm: Arc<dyn LlmBackend>, threshold: f64) -> Self {
        Self { llm, threshold }
    }
}

#[async_trait]
impl Filter for LlmChecker {
    fn name(&self) -> &str {
        NAME
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    async fn evaluate(
        &self,
        candidate: &OptimizedResume,
        job: &JobPosting,
        _source: &ResumeSource,
    ) -> Result<FilterResult, FilterError> {
        let resume = candidate.plain_text();
        if resume.trim().is_empty() {
            return Ok(FilterResult::scored(
                NAME,
                0.0,
                self.threshold,
                vec!["Resume has no content to review".to_string()],
                vec![],
            ));
        }

        let requirements = job
            .requirements
            .iter()
            .map(|r| format!("- {r}"))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = LLM_CHECK_PROMPT_TEMPLATE
            .replace("{job_title}", &job.title)
            .replace("{company}", &job.company)
            .replace("{requirements}", &requirements)
            .replace("{keywords}", &job.keywords.join(", "))
            .replace("{resume}", &resume);

        let review: QualityReview =
            call_json(self.llm.as_ref(), &prompt, &json_system(LLM_CHECK_ROLE)).await?;

        Ok(FilterResult::scored(
            NAME,
            review.score,
            self.threshold,
            review.issues,
            review.suggestions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedLlm;

    fn candidate(text: &str) -> OptimizedResume {
        OptimizedResume {
            pdf_text: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn job() -> JobPosting {
        JobPosting {
            title: "Platform Engineer".to_string(),
            company: "Acme".to_string(),
            requirements: vec!["Kubernetes in production".to_string()],
            keywords: vec!["Kubernetes".to_string(), "Go".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_review_score_drives_verdict() {
        let llm = Arc::new(ScriptedLlm::replying(
            r#"{"score": 0.62, "issues": ["Kubernetes buried"], "suggestions": ["Lead with it"]}"#,
        ));
        let r = LlmChecker::new(llm.clone(), 0.7)
            .evaluate(&candidate("resume text"), &job(), &ResumeSource::new("src"))
            .await
            .unwrap();

        assert!(!r.passed());
        assert_eq!(r.score(), 0.62);
        assert_eq!(r.issues(), ["Kubernetes buried"]);
        assert_eq!(r.suggestions(), ["Lead with it"]);

        let prompts = llm.prompts.lock().unwrap();
        let prompt = &prompts[0];
        assert!(prompt.contains("Platform Engineer at Acme"));
        assert!(prompt.contains("- Kubernetes in production"));
        assert!(prompt.contains("KEYWORDS: Kubernetes, Go"));
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_clamped() {
        let llm = Arc::new(ScriptedLlm::replying(r#"{"score": 7.5}"#));
        let r = LlmChecker::new(llm, 0.7)
            .evaluate(&candidate("resume text"), &job(), &ResumeSource::new("src"))
            .await
            .unwrap();
        assert_eq!(r.score(), 1.0);
        assert!(r.passed());
    }

    #[tokio::test]
    async fn test_empty_resume_fails_without_model_call() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let r = LlmChecker::new(llm.clone(), 0.7)
            .evaluate(&OptimizedResume::default(), &job(), &ResumeSource::new("src"))
            .await
            .unwrap();
        assert!(!r.passed());
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_is_an_error() {
        let llm = Arc::new(ScriptedLlm::new(vec![Err(crate::llm_client::LlmError::Api {
            status: 400,
            message: "quota exceeded".to_string(),
        })]));
        let result = LlmChecker::new(llm, 0.7)
            .evaluate(&candidate("resume text"), &job(), &ResumeSource::new("src"))
            .await;
        assert!(matches!(result, Err(FilterError::Llm(_))));
    }
}
