// Generation: job parsing, name extraction and resume tailoring.
// All LLM calls go through llm_client, never to Anthropic directly.

pub mod generator;
pub mod job_parser;
pub mod name_extractor;
pub mod prompts;

pub use generator::{GenerationError, LlmResumeGenerator, ResumeGenerator};
