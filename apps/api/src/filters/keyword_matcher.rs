//! Keyword Matcher: measures how many job keywords the candidate actually mentions.
//!
//! Algorithm:
//! 1. De-duplicate the job's keyword list case-insensitively.
//! 2. A keyword counts as present when it occurs in the candidate text (case-insensitive)
//!    without being glued to a neighbouring letter or digit, so "Go" does not match
//!    "Google" while "C++" and "CI/CD" still match.
//! 3. score = found / total
//! 4. Missing keywords are split into those the original resume supports (surface them)
//!    and those it does not (never invent them).

use std::collections::HashSet;

use async_trait::async_trait;

use super::{Filter, FilterError};
use crate::models::{FilterResult, JobPosting, OptimizedResume, ResumeSource};

pub const NAME: &str = "KeywordMatcher";
const PRIORITY: i32 = 3;
/// How many missing keywords are listed by name in a single issue line.
const MAX_LISTED: usize = 10;

/// Result of matching a keyword list against a text.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordCoverage {
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

impl KeywordCoverage {
    /// Fraction of keywords found. An empty keyword list is fully covered.
    pub fn ratio(&self) -> f64 {
        let total = self.found.len() + self.missing.len();
        if total == 0 {
            1.0
        } else {
            self.found.len() as f64 / total as f64
        }
    }
}

pub struct KeywordMatcher {
    threshold: f64,
}

impl KeywordMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

#[async_trait]
impl Filter for KeywordMatcher {
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
        source: &ResumeSource,
    ) -> Result<FilterResult, FilterError> {
        let text = candidate.plain_text();
        let coverage = check_keywords(&text, &job.keywords);

        let mut issues = Vec::new();
        let mut suggestions = Vec::new();

        if !coverage.missing.is_empty() {
            issues.push(format!(
                "Missing {} of {} job keywords: {}",
                coverage.missing.len(),
                coverage.found.len() + coverage.missing.len(),
                list(&coverage.missing)
            ));

            let source_lower = source.content.to_lowercase();
            let (supported, unsupported): (Vec<String>, Vec<String>) = coverage
                .missing
                .iter()
                .cloned()
                .partition(|kw| contains_keyword(&source_lower, &kw.to_lowercase()));

            if !supported.is_empty() {
                suggestions.push(format!(
                    "The original resume mentions {}; surface them where they fit naturally",
                    list(&supported)
                ));
            }
            if !unsupported.is_empty() {
                suggestions.push(format!(
                    "{} not supported by the original resume; do NOT add them",
                    list(&unsupported)
                ));
            }
        }

        Ok(FilterResult::scored(
            NAME,
            coverage.ratio(),
            self.threshold,
            issues,
            suggestions,
        ))
    }
}

/// Checks which of `keywords` occur in `text`. Comparison is case-insensitive and
/// whole-word aware; duplicate keywords (ignoring case) are counted once.
pub fn check_keywords(text: &str, keywords: &[String]) -> KeywordCoverage {
    let text_lower = text.to_lowercase();
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    let mut missing = Vec::new();

    for keyword in keywords {
        let keyword = keyword.trim();
        let keyword_lower = keyword.to_lowercase();
        if keyword_lower.is_empty() || !seen.insert(keyword_lower.clone()) {
            continue;
        }
        if contains_keyword(&text_lower, &keyword_lower) {
            found.push(keyword.to_string());
        } else {
            missing.push(keyword.to_string());
        }
    }

    KeywordCoverage { found, missing }
}

/// Both arguments must already be lowercase.
/// Whole-word occurrence of `keyword` in `text`. Both must already share a case.
pub(crate) fn contains_keyword(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !is_word_char(before) && !is_word_char(after)
    })
}

fn is_word_char(c: Option<char>) -> bool {
    c.is_some_and(char::is_alphanumeric)
}

fn list(keywords: &[String]) -> String {
    let mut listed = keywords
        .iter()
        .take(MAX_LISTED)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if keywords.len() > MAX_LISTED {
        listed.push_str(&format!(" (+{} more)", keywords.len() - MAX_LISTED));
    }
    listed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn job(list: &[&str]) -> JobPosting {
        JobPosting {
            title: "Data Engineer".to_string(),
            company: "Acme".to_string(),
            keywords: keywords(list),
            ..Default::default()
        }
    }

    fn candidate(text: &str) -> OptimizedResume {
        OptimizedResume {
            pdf_text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let coverage = check_keywords("Built PYTHON services", &keywords(&["python"]));
        assert_eq!(coverage.found, ["python"]);
    }

    #[test]
    fn test_match_respects_word_boundaries() {
        let coverage = check_keywords("Worked at Google on Java", &keywords(&["Go", "Java"]));
        assert_eq!(coverage.missing, ["Go"]);
        assert_eq!(coverage.found, ["Java"]);
    }

    #[test]
    fn test_symbolic_keywords_match() {
        let coverage = check_keywords(
            "Shipped C++ and Node.js services; CI/CD with GitHub Actions",
            &keywords(&["C++", "node.js", "CI/CD", "C#"]),
        );
        assert_eq!(coverage.found, ["C++", "node.js", "CI/CD"]);
        assert_eq!(coverage.missing, ["C#"]);
    }

    #[test]
    fn test_multi_word_keywords_match() {
        let coverage = check_keywords(
            "Designed distributed systems at scale",
            &keywords(&["Distributed Systems"]),
        );
        assert!(coverage.missing.is_empty());
    }

    #[test]
    fn test_duplicate_keywords_count_once() {
        let coverage = check_keywords("python", &keywords(&["Python", "python", " PYTHON "]));
        assert_eq!(coverage.found.len(), 1);
        assert_eq!(coverage.ratio(), 1.0);
    }

    #[test]
    fn test_no_keywords_is_full_coverage() {
        assert_eq!(check_keywords("anything", &[]).ratio(), 1.0);
    }

    #[tokio::test]
    async fn test_two_of_three_keywords_fails_at_point_eight() {
        let source = ResumeSource::new("Skills: Python, SQL");
        let r = KeywordMatcher::new(0.8)
            .evaluate(
                &candidate("Skills: Python, SQL"),
                &job(&["Python", "SQL", "Docker"]),
                &source,
            )
            .await
            .unwrap();

        assert!((r.score() - 2.0 / 3.0).abs() < 1e-9);
        assert!(!r.passed());
        assert!(r.issues()[0].contains("Docker"));
        assert!(r
            .suggestions()
            .iter()
            .any(|s| s.contains("Docker") && s.contains("do NOT add")));
    }

    #[tokio::test]
    async fn test_missing_keyword_from_source_is_suggested() {
        let source = ResumeSource::new("Skills: Python, SQL, Docker");
        let r = KeywordMatcher::new(0.8)
            .evaluate(
                &candidate("Skills: Python, SQL"),
                &job(&["Python", "SQL", "Docker"]),
                &source,
            )
            .await
            .unwrap();

        assert!(r
            .suggestions()
            .iter()
            .any(|s| s.contains("original resume mentions Docker")));
    }

    #[tokio::test]
    async fn test_full_coverage_passes() {
        let r = KeywordMatcher::new(0.8)
            .evaluate(
                &candidate("Python, SQL and Docker"),
                &job(&["Python", "SQL", "Docker"]),
                &ResumeSource::new("Python, SQL, Docker"),
            )
            .await
            .unwrap();
        assert!(r.passed());
        assert!(r.issues().is_empty());
    }

    #[tokio::test]
    async fn test_evaluation_is_idempotent() {
        let matcher = KeywordMatcher::new(0.8);
        let source = ResumeSource::new("Python");
        let c = candidate("Python and Rust");
        let j = job(&["Python", "Kafka"]);
        let first = matcher.evaluate(&c, &j, &source).await.unwrap();
        let second = matcher.evaluate(&c, &j, &source).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_list_truncates_long_lists() {
        let many: Vec<String> = (0..12).map(|i| format!("kw{i}")).collect();
        let listed = list(&many);
        assert!(listed.ends_with("(+2 more)"));
    }
}
