use serde::{Deserialize, Serialize};

/// Structured job posting produced once per run by the job parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub raw_text: String,
}

impl JobPosting {
    /// Requirement-oriented text used for semantic comparison against a candidate.
    pub fn requirements_text(&self) -> String {
        let mut parts = vec![format!("{} at {}", self.title, self.company)];
        parts.extend(self.requirements.iter().cloned());
        parts.extend(self.responsibilities.iter().cloned());
        if !self.keywords.is_empty() {
            parts.push(self.keywords.join(", "));
        }
        parts.join("\n")
    }
}
