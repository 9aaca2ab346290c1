use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_EMBEDDING_API_URL: &str = "https://api.openai.com/v1/embeddings";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Score cutoffs for each filter. Every value must lie in (0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterThresholds {
    pub faithfulness: f64,
    /// Minimum acceptable `1 - ai_probability`.
    pub ai_generated: f64,
    pub keyword: f64,
    pub llm_quality: f64,
    pub vector_similarity: f64,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        Self {
            faithfulness: 0.9,
            ai_generated: 0.5,
            keyword: 0.6,
            llm_quality: 0.7,
            vector_similarity: 0.4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Vector-similarity filtering is enabled only when this is set.
    pub embedding: Option<EmbeddingConfig>,
    pub port: u16,
    pub rust_log: String,
    pub thresholds: FilterThresholds,
    pub min_words: usize,
    pub max_words: usize,
    pub filter_timeout: Duration,
    pub llm_timeout: Duration,
    pub default_max_iterations: usize,
    /// Finished runs kept in memory; older ones are evicted.
    pub retain_finished_runs: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = FilterThresholds::default();
        let thresholds = FilterThresholds {
            faithfulness: threshold_env("FILTER_FAITHFULNESS_THRESHOLD", defaults.faithfulness)?,
            ai_generated: threshold_env("FILTER_AI_THRESHOLD", defaults.ai_generated)?,
            keyword: threshold_env("FILTER_KEYWORD_THRESHOLD", defaults.keyword)?,
            llm_quality: threshold_env("FILTER_LLM_THRESHOLD", defaults.llm_quality)?,
            vector_similarity: threshold_env("FILTER_VECTOR_THRESHOLD", defaults.vector_similarity)?,
        };

        let embedding = optional_env("EMBEDDING_API_KEY").map(|api_key| EmbeddingConfig {
            api_url: optional_env("EMBEDDING_API_URL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_API_URL.to_string()),
            api_key,
            model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        });

        let config = Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            embedding,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            thresholds,
            min_words: parse_env("RESUME_MIN_WORDS", 200)?,
            max_words: parse_env("RESUME_MAX_WORDS", 900)?,
            filter_timeout: Duration::from_secs(parse_env("FILTER_TIMEOUT_SECS", 60)?),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 120)?),
            default_max_iterations: parse_env("DEFAULT_MAX_ITERATIONS", 5)?,
            retain_finished_runs: parse_env("RETAIN_FINISHED_RUNS", 500)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.min_words > self.max_words {
            bail!(
                "RESUME_MIN_WORDS ({}) must not exceed RESUME_MAX_WORDS ({})",
                self.min_words,
                self.max_words
            );
        }
        if !(1..=10).contains(&self.default_max_iterations) {
            bail!(
                "DEFAULT_MAX_ITERATIONS must be between 1 and 10, got {}",
                self.default_max_iterations
            );
        }
        if self.retain_finished_runs == 0 {
            bail!("RETAIN_FINISHED_RUNS must be at least 1");
        }
        Ok(())
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn threshold_env(key: &str, default: f64) -> Result<f64> {
    let value = parse_env(key, default)?;
    if !(value > 0.0 && value <= 1.0) {
        bail!("{key} must be in (0, 1], got {value}");
    }
    Ok(value)
}

#[cfg(test)]
impl Config {
    /// Configuration with defaults and no embedding backend, for tests.
    pub fn for_tests() -> Self {
        Self {
            anthropic_api_key: "test-key".to_string(),
            embedding: None,
            port: 0,
            rust_log: "debug".to_string(),
            thresholds: FilterThresholds::default(),
            min_words: 200,
            max_words: 900,
            filter_timeout: Duration::from_secs(60),
            llm_timeout: Duration::from_secs(120),
            default_max_iterations: 5,
            retain_finished_runs: 100,
        }
    }
}
