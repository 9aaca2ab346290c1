//! Content Integrity: faithfulness and AI-generation checks in a single model call.
//!
//! Both checks need the same original-vs-tailored context, so they share one prompt.
//! The filter passes only if both dimensions clear their own thresholds. The reported
//! score and threshold are those of the weaker dimension (smallest margin above its
//! threshold), so `passed == score >= threshold` holds for the combined result.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use super::prompts::{CONTENT_INTEGRITY_PROMPT_TEMPLATE, CONTENT_INTEGRITY_ROLE};
use super::{Filter, FilterError};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{call_json, LlmBackend};
use crate::models::{FilterResult, JobPosting, OptimizedResume, ResumeSource};

pub const NAME: &str = "ContentIntegrityChecker";
const PRIORITY: i32 = 2;

/// Raw model output.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrityVerdict {
    pub faithfulness_score: f64,
    #[serde(default)]
    pub fabrication_concerns: Vec<String>,
    pub ai_probability: f64,
    #[serde(default)]
    pub ai_indicators: Vec<String>,
}

pub struct ContentIntegrityChecker {
    llm: Arc<dyn LlmBackend>,
    faithfulness_threshold: f64,
    ai_threshold: f64,
}

impl ContentIntegrityChecker {
    pub fn new(llm: Arc<dyn LlmBackend>, faithfulness_threshold: f64, ai_threshold: f64) -> Self {
        Self {
            llm,
            faithfulness_threshold,
            ai_threshold,
        }
    }

    fn combine(&self, verdict: IntegrityVerdict) -> FilterResult {
        let faithfulness = unit(verdict.faithfulness_score);
        let authenticity = 1.0 - unit(verdict.ai_probability);

        let mut issues = Vec::new();
        let mut suggestions = Vec::new();

        issues.extend(
            verdict
                .fabrication_concerns
                .iter()
                .map(|c| format!("Possible fabrication: {c}")),
        );
        if faithfulness < self.faithfulness_threshold {
            issues.push(format!(
                "Faithfulness {faithfulness:.2} is below {:.2}",
                self.faithfulness_threshold
            ));
            suggestions.push(
                "Remove or reword every claim that does not appear in the original resume"
                    .to_string(),
            );
        }

        issues.extend(
            verdict
                .ai_indicators
                .iter()
                .map(|i| format!("AI giveaway: {i}")),
        );
        if authenticity < self.ai_threshold {
            issues.push(format!(
                "AI-generation likelihood {:.2} exceeds {:.2}",
                1.0 - authenticity,
                1.0 - self.ai_threshold
            ));
        }
        if !verdict.ai_indicators.is_empty() || authenticity < self.ai_threshold {
            suggestions.push(
                "Vary bullet length and structure; replace generic phrasing with specifics from the original"
                    .to_string(),
            );
        }

        let faithfulness_margin = faithfulness - self.faithfulness_threshold;
        let authenticity_margin = authenticity - self.ai_threshold;
        let (score, threshold) = if faithfulness_margin <= authenticity_margin {
            (faithfulness, self.faithfulness_threshold)
        } else {
            (authenticity, self.ai_threshold)
        };

        FilterResult::scored(NAME, score, threshold, issues, suggestions)
    }
}

#[async_trait]
impl Filter for ContentIntegrityChecker {
    fn name(&self) -> &str {
        NAME
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn threshold(&self) -> f64 {
        self.faithfulness_threshold
    }

    async fn evaluate(
        &self,
        candidate: &OptimizedResume,
        _job: &JobPosting,
        source: &ResumeSource,
    ) -> Result<FilterResult, FilterError> {
        let optimized = candidate.plain_text();
        let optimized = if optimized.trim().is_empty() {
            "(no content)"
        } else {
            &*optimized
        };

        let prompt = CONTENT_INTEGRITY_PROMPT_TEMPLATE
            .replace("{today}", &Utc::now().format("%B %Y").to_string())
            .replace("{original}", &source.content)
            .replace("{optimized}", optimized);

        let verdict: IntegrityVerdict =
            call_json(self.llm.as_ref(), &prompt, &json_system(CONTENT_INTEGRITY_ROLE)).await?;

        Ok(self.combine(verdict))
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
