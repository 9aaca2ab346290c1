use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The candidate's original resume. Source of truth for every faithfulness check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSource {
    pub content: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ResumeSource {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_name(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    /// "First Last", or whichever half is known.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub year: Option<String>,
}

/// Structured resume content produced by the generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    pub contact: ContactInfo,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

impl ResumeData {
    /// Flattens the structured sections into plain text, one line per field.
    pub fn to_plain_text(&self) -> String {
        let mut lines = vec![self.contact.name.clone()];
        let contact_line: Vec<&str> = [
            self.contact.email.as_deref(),
            self.contact.phone.as_deref(),
            self.contact.location.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !contact_line.is_empty() {
            lines.push(contact_line.join(" | "));
        }
        lines.extend(self.contact.links.iter().cloned());

        if let Some(summary) = &self.summary {
            lines.push(String::new());
            lines.push("Summary".to_string());
            lines.push(summary.clone());
        }

        if !self.experience.is_empty() {
            lines.push(String::new());
            lines.push("Experience".to_string());
            for entry in &self.experience {
                let dates = match (&entry.start, &entry.end) {
                    (Some(s), Some(e)) => format!(" ({s} - {e})"),
                    (Some(s), None) => format!(" ({s} - Present)"),
                    _ => String::new(),
                };
                lines.push(format!("{}, {}{}", entry.title, entry.company, dates));
                lines.extend(entry.bullets.iter().map(|b| format!("- {b}")));
            }
        }

        if !self.education.is_empty() {
            lines.push(String::new());
            lines.push("Education".to_string());
            for entry in &self.education {
                match &entry.year {
                    Some(year) => {
                        lines.push(format!("{}, {} ({year})", entry.degree, entry.institution))
                    }
                    None => lines.push(format!("{}, {}", entry.degree, entry.institution)),
                }
            }
        }

        if !self.skills.is_empty() {
            lines.push(String::new());
            lines.push(format!("Skills: {}", self.skills.join(", ")));
        }

        if !self.certifications.is_empty() {
            lines.push(format!("Certifications: {}", self.certifications.join(", ")));
        }

        lines.join("\n")
    }
}

/// One iteration's generated resume. A fresh value is produced every iteration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizedResume {
    #[serde(default)]
    pub data: Option<ResumeData>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub pdf_text: Option<String>,
    /// 0-based iteration that produced this candidate.
    #[serde(default)]
    pub iteration: usize,
}

impl OptimizedResume {
    pub fn from_data(data: ResumeData, iteration: usize) -> Self {
        Self {
            data: Some(data),
            iteration,
            ..Default::default()
        }
    }

    /// The text filters judge: extracted document text, then markup, then structured data.
    pub fn plain_text(&self) -> Cow<'_, str> {
        if let Some(text) = self.pdf_text.as_deref().filter(|t| !t.trim().is_empty()) {
            return Cow::Borrowed(text);
        }
        if let Some(html) = self.html.as_deref().filter(|h| !h.trim().is_empty()) {
            return Cow::Owned(strip_markup(html));
        }
        match &self.data {
            Some(data) => Cow::Owned(data.to_plain_text()),
            None => Cow::Borrowed(""),
        }
    }

    pub fn word_count(&self) -> usize {
        self.plain_text().split_whitespace().count()
    }
}

fn strip_markup(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static tag pattern"));
    let text = tag.replace_all(html, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> ResumeData {
        ResumeData {
            contact: ContactInfo {
                name: "Ada Lovelace".to_string(),
                email: Some("ada@example.com".to_string()),
                ..Default::default()
            },
            summary: Some("Backend engineer".to_string()),
            experience: vec![ExperienceEntry {
                title: "Software Engineer".to_string(),
                company: "Analytical Engines".to_string(),
                start: Some("2019".to_string()),
                bullets: vec!["Built Python ETL jobs over SQL warehouses".to_string()],
                ..Default::default()
            }],
            skills: vec!["Python".to_string(), "SQL".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_full_name_joins_known_parts() {
        let source = ResumeSource::new("text")
            .with_name(Some("Ada".to_string()), Some("Lovelace".to_string()));
        assert_eq!(source.full_name().as_deref(), Some("Ada Lovelace"));

        let first_only = ResumeSource::new("text").with_name(Some("Ada".to_string()), None);
        assert_eq!(first_only.full_name().as_deref(), Some("Ada"));

        assert!(ResumeSource::new("text").full_name().is_none());
    }

    #[test]
    fn test_plain_text_prefers_pdf_text() {
        let candidate = OptimizedResume {
            data: Some(sample_data()),
            html: Some("<p>markup</p>".to_string()),
            pdf_text: Some("extracted".to_string()),
            ..Default::default()
        };
        assert_eq!(candidate.plain_text(), "extracted");
    }

    #[test]
    fn test_plain_text_strips_markup() {
        let candidate = OptimizedResume {
            html: Some("<h1>Ada</h1>\n<ul><li>Rust</li><li>SQL</li></ul>".to_string()),
            ..Default::default()
        };
        assert_eq!(candidate.plain_text(), "Ada Rust SQL");
    }

    #[test]
    fn test_plain_text_flattens_data() {
        let candidate = OptimizedResume::from_data(sample_data(), 0);
        let text = candidate.plain_text();
        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("Software Engineer, Analytical Engines (2019 - Present)"));
        assert!(text.contains("- Built Python ETL jobs"));
        assert!(text.contains("Skills: Python, SQL"));
    }

    #[test]
    fn test_empty_candidate_has_no_words() {
        assert_eq!(OptimizedResume::default().word_count(), 0);
    }

    #[test]
    fn test_resume_data_deserializes_with_missing_optional_sections() {
        let json = r#"{"contact": {"name": "Ada"}, "experience": []}"#;
        let data: ResumeData = serde_json::from_str(json).unwrap();
        assert_eq!(data.contact.name, "Ada");
        assert!(data.skills.is_empty());
        assert!(data.summary.is_none());
    }
}
