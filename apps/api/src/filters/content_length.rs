//! Content-length filter: the candidate's word count must fall inside a configured range.

use async_trait::async_trait;

use super::{Filter, FilterError};
use crate::models::{FilterResult, JobPosting, OptimizedResume, ResumeSource};

pub const NAME: &str = "ContentLengthChecker";
const PRIORITY: i32 = 0;
/// In range scores exactly 1.0; anything outside scores below it.
const THRESHOLD: f64 = 1.0;

pub struct ContentLengthChecker {
    min_words: usize,
    max_words: usize,
}

impl ContentLengthChecker {
    pub fn new(min_words: usize, max_words: usize) -> Self {
        Self {
            min_words,
            max_words,
        }
    }

    fn check(&self, word_count: usize) -> FilterResult {
        if word_count < self.min_words {
            let missing = self.min_words - word_count;
            return FilterResult::scored(
                NAME,
                word_count as f64 / self.min_words as f64,
                THRESHOLD,
                vec![format!(
                    "Resume is too short: {word_count} words (minimum {})",
                    self.min_words
                )],
                vec![format!(
                    "Expand by roughly {missing} words using details already present in the original resume"
                )],
            );
        }

        if word_count > self.max_words {
            let excess = word_count - self.max_words;
            return FilterResult::scored(
                NAME,
                self.max_words as f64 / word_count as f64,
                THRESHOLD,
                vec![format!(
                    "Resume is too long: {word_count} words (maximum {})",
                    self.max_words
                )],
                vec![format!(
                    "Cut roughly {excess} words: drop the least relevant bullets and tighten phrasing"
                )],
            );
        }

        FilterResult::scored(NAME, 1.0, THRESHOLD, vec![], vec![])
    }
}

#[async_trait]
impl Filter for ContentLengthChecker {
    fn name(&self) -> &str {
        NAME
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn threshold(&self) -> f64 {
        THRESHOLD
    }

    async fn evaluate(
        &self,
        candidate: &OptimizedResume,
        _job: &JobPosting,
        _source: &ResumeSource,
    ) -> Result<FilterResult, FilterError> {
        Ok(self.check(candidate.word_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate_with_words(n: usize) -> OptimizedResume {
        OptimizedResume {
            pdf_text: Some(vec!["word"; n].join(" ")),
            ..Default::default()
        }
    }

    async fn run(checker: &ContentLengthChecker, words: usize) -> FilterResult {
        checker
            .evaluate(
                &candidate_with_words(words),
                &JobPosting::default(),
                &ResumeSource::new("original"),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_in_range_passes_with_full_score() {
        let r = run(&ContentLengthChecker::new(10, 20), 15).await;
        assert!(r.passed());
        assert_eq!(r.score(), 1.0);
        assert!(r.issues().is_empty());
    }

    #[tokio::test]
    async fn test_bounds_are_inclusive() {
        let checker = ContentLengthChecker::new(10, 20);
        assert!(run(&checker, 10).await.passed());
        assert!(run(&checker, 20).await.passed());
    }

    #[tokio::test]
    async fn test_too_short_fails_with_ratio_score() {
        let r = run(&ContentLengthChecker::new(10, 20), 5).await;
        assert!(!r.passed());
        assert!((r.score() - 0.5).abs() < 1e-9);
        assert!(r.issues()[0].contains("too short"));
        assert!(r.suggestions()[0].contains("5 words"));
    }

    #[tokio::test]
    async fn test_too_long_fails_with_ratio_score() {
        let r = run(&ContentLengthChecker::new(10, 20), 40).await;
        assert!(!r.passed());
        assert!((r.score() - 0.5).abs() < 1e-9);
        assert!(r.issues()[0].contains("too long"));
    }

    #[tokio::test]
    async fn test_empty_candidate_fails() {
        let r = run(&ContentLengthChecker::new(10, 20), 0).await;
        assert!(!r.passed());
        assert_eq!(r.score(), 0.0);
    }

    #[tokio::test]
    async fn test_evaluation_is_idempotent() {
        let checker = ContentLengthChecker::new(10, 20);
        assert_eq!(run(&checker, 25).await, run(&checker, 25).await);
    }
}
