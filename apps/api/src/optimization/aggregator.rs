//! Validation Aggregator: runs every registered filter against one candidate.
//!
//! Each filter call is bounded by its own timeout and isolated from panics. Errors,
//! timeouts and panics all become fail-closed results, so the verdict always holds
//! one result per registered filter, in registry (priority) order.

use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use futures::future::join_all;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::filters::{Filter, FilterError, FilterRegistry};
use crate::models::{FilterResult, JobPosting, OptimizedResume, ResumeSource, ValidationResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One filter at a time, in priority order.
    Sequential,
    /// All filters launched together and joined.
    #[default]
    Parallel,
}

impl ExecutionMode {
    pub fn from_parallel(parallel: bool) -> Self {
        if parallel {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

/// Runs the registry against `candidate` and combines the results into one verdict.
pub async fn validate(
    registry: &FilterRegistry,
    candidate: &OptimizedResume,
    job: &JobPosting,
    source: &ResumeSource,
    mode: ExecutionMode,
    filter_timeout: Duration,
) -> ValidationResult {
    if registry.is_empty() {
        debug!("No filters registered, verdict passes vacuously");
        return ValidationResult::new(Vec::new());
    }

    let results = match mode {
        ExecutionMode::Sequential => {
            let mut results = Vec::with_capacity(registry.len());
            for filter in registry.filters() {
                let result = run_filter(filter.as_ref(), candidate, job, source, filter_timeout);
                results.push(result.await);
            }
            results
        }
        // join_all yields outputs in input order, which is already priority order.
        ExecutionMode::Parallel => {
            join_all(
                registry
                    .filters()
                    .iter()
                    .map(|f| run_filter(f.as_ref(), candidate, job, source, filter_timeout)),
            )
            .await
        }
    };

    ValidationResult::new(results)
}

async fn run_filter(
    filter: &dyn Filter,
    candidate: &OptimizedResume,
    job: &JobPosting,
    source: &ResumeSource,
    filter_timeout: Duration,
) -> FilterResult {
    let started = Instant::now();

    let evaluation = tokio::time::timeout(filter_timeout, filter.evaluate(candidate, job, source));
    let outcome = match AssertUnwindSafe(evaluation).catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(_elapsed)) => Err(FilterError::Timeout(filter_timeout)),
        Err(_panic) => Err(FilterError::Panicked),
    };

    debug!(
        "Filter {} finished in {}ms",
        filter.name(),
        started.elapsed().as_millis()
    );

    match outcome {
        Ok(result) => result,
        Err(e) => {
            warn!("Filter {} failed closed: {e}", filter.name());
            FilterResult::failed_closed(
                filter.name(),
                filter.threshold(),
                format!("{} failed: {e}", filter.name()),
            )
        }
    }
}
