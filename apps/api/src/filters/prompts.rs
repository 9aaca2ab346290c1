// All LLM prompt constants for the model-backed filters.

/// System prompt role for the content-integrity check. Date and JSON rules are appended at call time.
pub const CONTENT_INTEGRITY_ROLE: &str = "You audit tailored resumes for two things in one pass: \
    faithfulness to the candidate's original resume, and signs of fabricated or machine-written filler.";

/// Content-integrity prompt template.
/// Replace: {today}, {original}, {optimized}
pub const CONTENT_INTEGRITY_PROMPT_TEMPLATE: &str = r#"Today's date: {today}

CHECK 1 — FAITHFULNESS
Compare the TAILORED resume against the ORIGINAL resume. Score 0.0–1.0:
- 1.0: everything traces to the original; only rewording, reordering, emphasis
- 0.95–0.99: small reasonable additions (closely related technologies, umbrella terms such as "SQL" for a database user)
- 0.85–0.94: light assumptions that a reader would notice
- 0.70–0.84: questionable additions that stretch the original
- 0.50–0.69: claims that may well be false
- below 0.50: invented employers, job titles, dates, degrees, certifications, awards or metrics

Never penalize: summaries synthesized from existing experience, restructuring, reformatted numbers ("1% - 10%" → "1-10%").
Always penalize heavily (below 0.70): a job title, employer, degree or metric that does not appear in the original.

CHECK 2 — MACHINE-WRITTEN FILLER
Resumes are meant to be formulaic (action verb + task + result, consistent bullets, quantified outcomes, clean grammar). Do NOT flag those.
Flag only: timeline contradictions, conflicting titles for the same role, buzzword runs with no specifics, identical generic filler repeated, technologies that did not exist in the claimed period.
Score ai_probability 0.0–1.0: 0.0–0.3 normal resume, 0.3–0.5 slightly over-polished, 0.5–0.7 several genuine tells, 0.7–1.0 clearly fabricated.

Return a JSON object with this EXACT schema:
{
  "faithfulness_score": 0.97,
  "fabrication_concerns": ["Title 'Staff Engineer' at Acme not in original (original: 'Engineer')"],
  "ai_probability": 0.2,
  "ai_indicators": ["'results-driven synergy' repeated in three bullets"]
}

=== ORIGINAL RESUME (source of truth) ===
{original}

=== TAILORED RESUME ===
{optimized}
=== END ==="#;

/// System prompt role for the holistic quality review.
pub const LLM_CHECK_ROLE: &str = "You are a senior technical recruiter reviewing a resume \
    that was tailored for a specific job posting.";

/// Holistic review prompt template.
/// Replace: {job_title}, {company}, {requirements}, {keywords}, {resume}
pub const LLM_CHECK_PROMPT_TEMPLATE: &str = r#"Judge how well this resume would perform for the role below, as a recruiter doing a first screen.

RUBRIC (weigh equally):
1. Relevance — the most role-relevant experience is prominent
2. Evidence — bullets show concrete outcomes, not duties
3. Clarity — scannable in under 30 seconds, no walls of text
4. Language — matches the posting's vocabulary without keyword stuffing

Return a JSON object with this EXACT schema:
{
  "score": 0.78,
  "issues": ["Kubernetes experience is buried in the last role"],
  "suggestions": ["Lead the most recent role with the Kubernetes migration bullet"]
}
"score" is 0.0–1.0. Keep issues and suggestions short and actionable; at most 5 each.

ROLE: {job_title} at {company}
REQUIREMENTS:
{requirements}
KEYWORDS: {keywords}

RESUME:
{resume}"#;
