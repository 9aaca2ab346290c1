//! Vector similarity: semantic closeness of the candidate to the job's requirements.
//!
//! Embeds the job requirements and the candidate text in one request and scores their
//! cosine similarity, clamped to [0, 1]. Embedding failures surface as `FilterError`
//! and are failed closed by the aggregator.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Filter, FilterError};
use crate::llm_client::embeddings::{cosine_similarity, Embedder};
use crate::models::{FilterResult, JobPosting, OptimizedResume, ResumeSource};

pub const NAME: &str = "VectorSimilarityMatcher";
const PRIORITY: i32 = 5;

pub struct VectorSimilarityMatcher {
    embedder: Arc<dyn Embedder>,
    threshold: f64,
}

impl VectorSimilarityMatcher {
    pub fn new(embedder: Arc<dyn Embedder>, threshold: f64) -> Self {
        Self {
            embedder,
            threshold,
        }
    }
}

#[async_trait]
impl Filter for VectorSimilarityMatcher {
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
                vec!["Resume has no content to compare".to_string()],
                vec![],
            ));
        }

        let texts = [job.requirements_text(), resume.into_owned()];
        let vectors = self.embedder.embed(&texts).await?;
        let [job_vec, resume_vec] = vectors.as_slice() else {
            return Err(FilterError::Invalid(format!(
                "expected 2 embeddings, got {}",
                vectors.len()
            )));
        };

        check_dimensions(job_vec, resume_vec)?;
        let similarity = cosine_similarity(job_vec, resume_vec).max(0.0);

        let mut issues = Vec::new();
        let mut suggestions = Vec::new();
        if similarity < self.threshold {
            issues.push(format!(
                "Semantic similarity to the job is {similarity:.2} (needs {:.2})",
                self.threshold
            ));
            let focus: Vec<&str> = job
                .requirements
                .iter()
                .chain(&job.responsibilities)
                .take(3)
                .map(String::as_str)
                .collect();
            if !focus.is_empty() {
                suggestions.push(format!(
                    "Foreground experience closest to: {}",
                    focus.join("; ")
                ));
            }
        }

        Ok(FilterResult::scored(
            NAME,
            similarity,
            self.threshold,
            issues,
            suggestions,
        ))
    }
}

/// Rejects vector pairs the backend should never return, so they are not scored as a mismatch.
fn check_dimensions(job_vec: &[f32], resume_vec: &[f32]) -> Result<(), FilterError> {
    if job_vec.is_empty() || job_vec.len() != resume_vec.len() {
        return Err(FilterError::Invalid(format!(
            "embedding dimensions {} vs {}",
            job_vec.len(),
            resume_vec.len()
        )));
    }
    let is_zero = |v: &[f32]| v.iter().all(|x| *x == 0.0);
    if is_zero(job_vec) || is_zero(resume_vec) {
        return Err(FilterError::Invalid("embedding is an all-zero vector".to_string()));
    }
    Ok(())
}
