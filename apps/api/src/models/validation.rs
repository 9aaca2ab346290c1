use serde::Serialize;

/// One filter's verdict on one candidate.
///
/// Fields are private so that `passed` can only ever be derived from `score >= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResult {
    filter_name: String,
    passed: bool,
    score: f64,
    threshold: f64,
    issues: Vec<String>,
    suggestions: Vec<String>,
}

impl FilterResult {
    /// Builds a result from a score. The score is clamped to [0, 1] and NaN becomes 0.
    pub fn scored(
        filter_name: impl Into<String>,
        score: f64,
        threshold: f64,
        issues: Vec<String>,
        suggestions: Vec<String>,
    ) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Self {
            filter_name: filter_name.into(),
            passed: score >= threshold,
            score,
            threshold,
            issues,
            suggestions,
        }
    }

    /// Result for a filter whose evaluation could not complete: score 0, the cause as an issue.
    pub fn failed_closed(
        filter_name: impl Into<String>,
        threshold: f64,
        issue: impl Into<String>,
    ) -> Self {
        Self {
            filter_name: filter_name.into(),
            passed: false,
            score: 0.0,
            threshold,
            issues: vec![issue.into()],
            suggestions: Vec::new(),
        }
    }

    pub fn filter_name(&self) -> &str {
        &self.filter_name
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

/// Aggregate verdict for one candidate. `passed` is the AND of every contained result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    passed: bool,
    results: Vec<FilterResult>,
}

impl ValidationResult {
    pub fn new(results: Vec<FilterResult>) -> Self {
        Self {
            passed: results.iter().all(FilterResult::passed),
            results,
        }
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Results in filter priority order.
    pub fn results(&self) -> &[FilterResult] {
        &self.results
    }

    pub fn failing(&self) -> impl Iterator<Item = &FilterResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    pub fn passing(&self) -> impl Iterator<Item = &FilterResult> {
        self.results.iter().filter(|r| r.passed())
    }

    #[cfg(test)]
    pub fn result_for(&self, filter_name: &str) -> Option<&FilterResult> {
        self.results.iter().find(|r| r.filter_name() == filter_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scored_passes_at_threshold() {
        let r = FilterResult::scored("KeywordMatcher", 0.8, 0.8, vec![], vec![]);
        assert!(r.passed());
    }

    #[test]
    fn test_scored_fails_below_threshold() {
        let r = FilterResult::scored("KeywordMatcher", 2.0 / 3.0, 0.8, vec![], vec![]);
        assert!(!r.passed());
    }

    #[test]
    fn test_scored_clamps_out_of_range_scores() {
        assert_eq!(FilterResult::scored("x", 1.7, 0.5, vec![], vec![]).score(), 1.0);
        assert_eq!(FilterResult::scored("x", -0.2, 0.5, vec![], vec![]).score(), 0.0);
        let nan = FilterResult::scored("x", f64::NAN, 0.5, vec![], vec![]);
        assert_eq!(nan.score(), 0.0);
        assert!(!nan.passed());
    }

    #[test]
    fn test_failed_closed_never_passes() {
        let r = FilterResult::failed_closed("LLMChecker", 0.7, "timed out after 60s");
        assert!(!r.passed());
        assert_eq!(r.score(), 0.0);
        assert_eq!(r.threshold(), 0.7);
        assert_eq!(r.issues(), ["timed out after 60s"]);
    }

    #[test]
    fn test_validation_passes_only_when_all_pass() {
        let ok = FilterResult::scored("a", 1.0, 0.5, vec![], vec![]);
        let bad = FilterResult::scored("b", 0.1, 0.5, vec![], vec![]);

        assert!(ValidationResult::new(vec![ok.clone(), ok.clone()]).passed());
        let mixed = ValidationResult::new(vec![ok, bad]);
        assert!(!mixed.passed());
        assert_eq!(mixed.failing().count(), 1);
        assert_eq!(mixed.passing().count(), 1);
        assert!(mixed.result_for("b").is_some());
    }

    #[test]
    fn test_empty_validation_passes() {
        assert!(ValidationResult::new(vec![]).passed());
    }

    #[test]
    fn test_validation_serializes_flat_fields() {
        let v = ValidationResult::new(vec![FilterResult::scored(
            "ContentLengthChecker",
            1.0,
            1.0,
            vec![],
            vec![],
        )]);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["passed"], true);
        assert_eq!(json["results"][0]["filter_name"], "ContentLengthChecker");
        assert_eq!(json["results"][0]["threshold"], 1.0);
    }
}
