// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt role for job posting parsing. JSON rules are appended at call time.
pub const JOB_PARSE_ROLE: &str = "You are a job posting parser. \
    Extract structured information from job postings exactly as written.";

/// Job posting parsing prompt template. Replace `{job_text}` before sending.
pub const JOB_PARSE_PROMPT_TEMPLATE: &str = r#"Parse the following job posting.

Return a JSON object with this EXACT schema:
{
  "title": "Senior Software Engineer, Backend Infrastructure",
  "company": "Acme",
  "location": "Remote (EU)",
  "requirements": ["5+ years of Python", "Production experience with PostgreSQL"],
  "responsibilities": ["Own the ingestion pipeline"],
  "keywords": ["Python", "PostgreSQL", "Docker", "Kafka"],
  "description": "One or two sentence summary of the role"
}

Rules:
- title: the full title as written. Do NOT shorten, rephrase or generalize it.
- company: the employer, NOT a recruiting agency or job board. If the posting is "on behalf of" a client, use the client.
  If no company is named at all, use "Unknown".
- requirements: skills, experience and education the posting asks for.
- responsibilities: duties of the role.
- keywords: EVERY technology, tool, framework, language and methodology mentioned.
- Extract only what is explicitly stated. Never infer or invent names.

JOB POSTING:
{job_text}"#;

/// System prompt role for resume tailoring.
pub const GENERATION_ROLE: &str = "You are an expert resume writer tailoring a candidate's \
    existing resume to a specific job posting without inventing anything.";

/// Resume tailoring prompt template.
/// Replace: {grounding_instruction}, {job_json}, {original}, {feedback}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

TARGET JOB:
{job_json}

ORIGINAL RESUME (source of truth — ONLY use facts from here):
{original}
{feedback}
Rewrite the resume for the target job. Return a JSON object with this EXACT schema:
{
  "contact": {"name": "Full Name", "email": "a@b.com", "phone": null, "location": "City", "links": []},
  "summary": "2-3 sentence summary grounded in the original",
  "experience": [
    {
      "title": "Exact title from the original",
      "company": "Exact company from the original",
      "location": null,
      "start": "2021",
      "end": null,
      "bullets": ["Action verb + what + measurable result, all from the original"]
    }
  ],
  "education": [{"degree": "BSc Computer Science", "institution": "University", "year": "2018"}],
  "skills": ["Python", "SQL"],
  "certifications": []
}

HARD RULES:
1. Keep the candidate's name, employers, job titles, dates, degrees and institutions exactly as in the original
2. Never add a skill, tool, metric or achievement that the original does not support
3. Prefer the job's vocabulary when the original describes the same thing in other words
4. Put the most job-relevant experience and bullets first
5. Keep the whole resume between {min_words} and {max_words} words"#;

/// Feedback block appended on refinement iterations.
/// Replace: {failures}, {passed}
pub const FEEDBACK_TEMPLATE: &str = r#"
FEEDBACK ON YOUR PREVIOUS ATTEMPT (it failed validation).
Fix exactly these problems:
{failures}
Already passing — keep these aspects as they are: {passed}
"#;

/// System prompt role for name extraction.
pub const NAME_EXTRACT_ROLE: &str = "You extract the candidate's name from resume text.";

/// Name extraction prompt template. Replace `{resume}` before sending.
pub const NAME_EXTRACT_PROMPT_TEMPLATE: &str = r#"Return the candidate's first and last name as JSON:
{"first_name": "Ada", "last_name": "Lovelace"}
Use null for any part that is not present. Do not guess.

RESUME:
{resume}"#;
