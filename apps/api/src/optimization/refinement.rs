//! Refinement Loop: generate → validate → refine, bounded by `max_iterations`.
//!
//! Iteration `i` (0-based) generates with the verdict of iteration `i - 1` as feedback,
//! validates the new candidate, then notifies the listener. The loop stops on the first
//! passing verdict; running out of iterations with a failing verdict is a normal outcome.
//! Only generator failures abort a run.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::filters::FilterRegistry;
use crate::generation::{GenerationError, ResumeGenerator};
use crate::models::{JobPosting, OptimizedResume, ResumeSource, ValidationResult};
use crate::optimization::aggregator::{validate, ExecutionMode};

/// Upper bound accepted for `max_iterations`.
pub const MAX_ITERATIONS_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub max_iterations: usize,
    pub mode: ExecutionMode,
    pub filter_timeout: Duration,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            mode: ExecutionMode::Parallel,
            filter_timeout: Duration::from_secs(60),
        }
    }
}

/// Progress hook, called exactly once per completed iteration, in order.
///
/// Errors and panics raised here are logged and never affect the run.
pub trait IterationListener: Send + Sync {
    fn on_iteration(
        &self,
        iteration: usize,
        candidate: &OptimizedResume,
        verdict: &ValidationResult,
    ) -> anyhow::Result<()>;
}

impl<F> IterationListener for F
where
    F: Fn(usize, &OptimizedResume, &ValidationResult) -> anyhow::Result<()> + Send + Sync,
{
    fn on_iteration(
        &self,
        iteration: usize,
        candidate: &OptimizedResume,
        verdict: &ValidationResult,
    ) -> anyhow::Result<()> {
        self(iteration, candidate, verdict)
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    /// The last candidate produced, passing or not.
    pub candidate: OptimizedResume,
    /// Verdict for `candidate`.
    pub verdict: ValidationResult,
    pub iterations: usize,
    /// One verdict per iteration, oldest first.
    pub history: Vec<ValidationResult>,
}

pub async fn run_optimization(
    generator: &dyn ResumeGenerator,
    registry: &FilterRegistry,
    source: &ResumeSource,
    job: &JobPosting,
    options: &LoopOptions,
    listener: Option<&dyn IterationListener>,
) -> Result<OptimizationOutcome, OptimizeError> {
    if source.content.trim().is_empty() {
        return Err(OptimizeError::InvalidInput(
            "resume content is empty".to_string(),
        ));
    }
    if !(1..=MAX_ITERATIONS_LIMIT).contains(&options.max_iterations) {
        return Err(OptimizeError::InvalidInput(format!(
            "max_iterations must be between 1 and {MAX_ITERATIONS_LIMIT}, got {}",
            options.max_iterations
        )));
    }

    let max = options.max_iterations;
    let mut history: Vec<ValidationResult> = Vec::with_capacity(max);
    let mut last_candidate = None;

    for iteration in 0..max {
        let mut candidate = generator.generate(source, job, history.last()).await?;
        candidate.iteration = iteration;

        let verdict = validate(
            registry,
            &candidate,
            job,
            source,
            options.mode,
            options.filter_timeout,
        )
        .await;

        if verdict.passed() {
            info!("Iteration {}/{}: all filters passed", iteration + 1, max);
        } else {
            info!(
                "Iteration {}/{}: failed [{}]",
                iteration + 1,
                max,
                verdict
                    .failing()
                    .map(|r| r.filter_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        if let Some(listener) = listener {
            notify(listener, iteration, &candidate, &verdict);
        }

        let passed = verdict.passed();
        history.push(verdict);
        last_candidate = Some(candidate);
        if passed {
            break;
        }
    }

    match (last_candidate, history.last().cloned()) {
        (Some(candidate), Some(verdict)) => Ok(OptimizationOutcome {
            candidate,
            verdict,
            iterations: history.len(),
            history,
        }),
        _ => Err(OptimizeError::InvalidInput(
            "no iteration was executed".to_string(),
        )),
    }
}

fn notify(
    listener: &dyn IterationListener,
    iteration: usize,
    candidate: &OptimizedResume,
    verdict: &ValidationResult,
) {
    match catch_unwind(AssertUnwindSafe(|| {
        listener.on_iteration(iteration, candidate, verdict)
    })) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Iteration listener failed at iteration {iteration}: {e:#}"),
        Err(_) => warn!("Iteration listener panicked at iteration {iteration}"),
    }
}
