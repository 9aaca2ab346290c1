//! Data-validator filter: structural sanity of the candidate's structured sections.
//!
//! Each check is binary; the score is the fraction of checks passed, so a single
//! failed check fails the filter (threshold 1.0).

use async_trait::async_trait;

use super::{Filter, FilterError};
use crate::models::resume::ResumeData;
use crate::models::{FilterResult, JobPosting, OptimizedResume, ResumeSource};

pub const NAME: &str = "DataValidator";
const PRIORITY: i32 = 1;
const THRESHOLD: f64 = 1.0;

/// Fragments that indicate unfilled template text.
const PLACEHOLDER_MARKERS: &[&str] = &[
    "lorem ipsum",
    "[company",
    "[your",
    "[insert",
    "[x]",
    "{{",
    "todo",
    "tbd",
    "n/a",
];

struct Check {
    passed: bool,
    issue: String,
    suggestion: String,
}

impl Check {
    fn new(passed: bool, issue: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            passed,
            issue: issue.into(),
            suggestion: suggestion.into(),
        }
    }
}

#[derive(Default)]
pub struct DataValidator;

impl DataValidator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Filter for DataValidator {
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
        source: &ResumeSource,
    ) -> Result<FilterResult, FilterError> {
        let Some(data) = &candidate.data else {
            return Ok(FilterResult::scored(
                NAME,
                0.0,
                THRESHOLD,
                vec!["Candidate has no structured resume data".to_string()],
                vec!["Return the resume as structured sections".to_string()],
            ));
        };

        let checks = run_checks(data, source);
        let passed_count = checks.iter().filter(|c| c.passed).count();
        let score = passed_count as f64 / checks.len() as f64;

        let (issues, suggestions) = checks
            .into_iter()
            .filter(|c| !c.passed)
            .map(|c| (c.issue, c.suggestion))
            .unzip();

        Ok(FilterResult::scored(NAME, score, THRESHOLD, issues, suggestions))
    }
}

fn run_checks(data: &ResumeData, source: &ResumeSource) -> Vec<Check> {
    let mut checks = Vec::new();

    let name = data.contact.name.trim();
    checks.push(Check::new(
        !name.is_empty(),
        "Contact name is empty",
        "Include the candidate's full name from the original resume",
    ));

    if let Some(expected) = source.full_name() {
        checks.push(Check::new(
            name_matches(name, source),
            format!("Contact name '{name}' does not match the original resume ('{expected}')"),
            format!("Use the candidate's name exactly as in the original: {expected}"),
        ));
    }

    checks.push(Check::new(
        !data.experience.is_empty(),
        "No experience entries",
        "Include the work experience from the original resume",
    ));

    for (i, entry) in data.experience.iter().enumerate() {
        let label = if entry.title.trim().is_empty() {
            format!("Experience entry {}", i + 1)
        } else {
            format!("'{}'", entry.title.trim())
        };
        checks.push(Check::new(
            !entry.title.trim().is_empty() && !entry.company.trim().is_empty(),
            format!("{label} is missing a title or company"),
            "Every experience entry needs both a job title and a company",
        ));
        checks.push(Check::new(
            entry.bullets.iter().any(|b| !b.trim().is_empty()),
            format!("{label} has no bullet points"),
            format!("Add at least one achievement bullet to {label}"),
        ));
    }

    checks.push(Check::new(
        data.skills.iter().any(|s| !s.trim().is_empty()),
        "Skills section is empty",
        "List the candidate's skills that appear in the original resume",
    ));

    for (i, entry) in data.education.iter().enumerate() {
        checks.push(Check::new(
            !entry.degree.trim().is_empty() && !entry.institution.trim().is_empty(),
            format!("Education entry {} is missing a degree or institution", i + 1),
            "Fill in degree and institution, or drop the entry",
        ));
    }

    let placeholders = find_placeholders(data);
    checks.push(Check::new(
        placeholders.is_empty(),
        format!("Template placeholders left in: {}", placeholders.join("; ")),
        "Replace placeholder text with real content or remove it",
    ));

    checks
}

/// Every part of the source name must appear in the contact name.
fn name_matches(name: &str, source: &ResumeSource) -> bool {
    let name_lower = name.to_lowercase();
    [source.first_name.as_deref(), source.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .all(|part| name_lower.contains(&part))
}

fn find_placeholders(data: &ResumeData) -> Vec<String> {
    let mut fields: Vec<&str> = vec![data.contact.name.as_str()];
    fields.extend(data.summary.as_deref());
    for entry in &data.experience {
        fields.push(&entry.title);
        fields.push(&entry.company);
        fields.extend(entry.bullets.iter().map(String::as_str));
    }
    for entry in &data.education {
        fields.push(&entry.degree);
        fields.push(&entry.institution);
    }
    fields.extend(data.skills.iter().map(String::as_str));

    fields
        .into_iter()
        .filter(|field| is_placeholder(field))
        .map(|field| field.chars().take(40).collect())
        .collect()
}

fn is_placeholder(field: &str) -> bool {
    let lower = field.to_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|marker| {
        if marker.chars().all(|c| c.is_alphanumeric() || c == '/') {
            // Word-like markers only count as whole words ("todo", not "mastodon").
            lower
                .split(|c: char| !c.is_alphanumeric() && c != '/')
                .any(|word| word == *marker)
        } else {
            lower.contains(marker)
        }
    })
}
