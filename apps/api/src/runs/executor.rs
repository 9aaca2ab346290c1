//! Run executor: the background task behind `POST /api/v1/optimize`.
//!
//! Walks one run through parse_job → generate → validate/refine → complete | failed,
//! writing progress into the `RunStore` as it goes so clients can poll it.

use std::collections::HashMap;
use std::time::Instant;

use anyhow::{bail, Context};
use tracing::{error, info};
use uuid::Uuid;

use crate::generation::job_parser::parse_job_posting;
use crate::generation::name_extractor::extract_name;
use crate::models::{OptimizedResume, ResumeSource, ValidationResult};
use crate::optimization::{run_optimization, ExecutionMode, LoopOptions};
use crate::runs::store::{IterationFeedback, JobSummary, RunStatus};
use crate::state::AppState;

/// Inputs of one run, already validated by the handler.
#[derive(Debug, Clone)]
pub struct RunInput {
    pub resume_text: String,
    pub job_text: String,
    pub max_iterations: usize,
    pub mode: ExecutionMode,
}

/// Executes a run to completion. Never returns an error: failures are recorded on the run.
pub async fn execute_run(state: AppState, run_id: Uuid, input: RunInput) {
    let started = Instant::now();
    info!("[{run_id}] Optimization started (max {} iterations)", input.max_iterations);

    match drive(&state, run_id, &input, started).await {
        Ok(()) => info!(
            "[{run_id}] Optimization finished in {:.2}s",
            started.elapsed().as_secs_f64()
        ),
        Err(e) => {
            error!("[{run_id}] Optimization failed: {e:#}");
            state.runs.update(run_id, |run| {
                run.status = RunStatus::Failed;
                run.current_step = None;
                run.error = Some(format!("{e:#}"));
            });
        }
    }
}

async fn drive(
    state: &AppState,
    run_id: Uuid,
    input: &RunInput,
    started: Instant,
) -> anyhow::Result<()> {
    let store = &state.runs;
    let mut timing: HashMap<String, f64> = HashMap::new();

    store.update(run_id, |run| {
        run.status = RunStatus::ParseJob;
        run.current_step = Some("Parsing job posting...".to_string());
    });

    let step = Instant::now();
    let job = parse_job_posting(&input.job_text, state.llm.as_ref())
        .await
        .context("Failed to parse job posting")?;
    timing.insert("parse_job".to_string(), step.elapsed().as_secs_f64());

    store.update(run_id, |run| {
        run.status = RunStatus::Generate;
        run.current_step = Some(format!(
            "Optimizing resume for {} at {}...",
            job.title, job.company
        ));
        run.job_parsed = Some(JobSummary::from(&job));
    });

    let step = Instant::now();
    let (first_name, last_name) = extract_name(&input.resume_text, state.llm.as_ref()).await;
    timing.insert("extract_name".to_string(), step.elapsed().as_secs_f64());
    let source = ResumeSource::new(input.resume_text.clone()).with_name(first_name, last_name);

    let listener = |iteration: usize,
                    _candidate: &OptimizedResume,
                    verdict: &ValidationResult|
     -> anyhow::Result<()> {
        let recorded = store.update(run_id, |run| {
            run.status = if iteration == 0 {
                RunStatus::Validate
            } else {
                RunStatus::Refine
            };
            run.current_step = Some(format!(
                "Iteration {}: {}...",
                iteration + 1,
                if verdict.passed() { "Passed" } else { "Refining" }
            ));
            run.iterations = iteration + 1;
            run.feedback
                .push(IterationFeedback::from_verdict(iteration, verdict));
        });
        if !recorded {
            bail!("run {run_id} is no longer in the store");
        }
        Ok(())
    };

    let options = LoopOptions {
        max_iterations: input.max_iterations,
        mode: input.mode,
        filter_timeout: state.config.filter_timeout,
    };

    let step = Instant::now();
    let outcome = run_optimization(
        state.generator.as_ref(),
        &state.registry,
        &source,
        &job,
        &options,
        Some(&listener),
    )
    .await?;
    timing.insert("optimization_loop".to_string(), step.elapsed().as_secs_f64());
    timing.insert("total".to_string(), started.elapsed().as_secs_f64());

    info!(
        "[{run_id}] Loop finished after {} iteration(s), passed={}",
        outcome.iterations,
        outcome.verdict.passed()
    );

    store.update(run_id, |run| {
        run.status = RunStatus::Complete;
        run.current_step = None;
        run.iterations = outcome.iterations;
        // The loop's history is authoritative even if a progress update was lost.
        run.feedback = outcome
            .history
            .iter()
            .enumerate()
            .map(|(index, verdict)| IterationFeedback::from_verdict(index, verdict))
            .collect();
        run.passed = Some(outcome.verdict.passed());
        run.result = Some(outcome.candidate);
        run.timing = timing;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::filters::registry::testing::{Behavior, StubFilter};
    use crate::filters::FilterRegistry;
    use crate::generation::LlmResumeGenerator;
    use crate::llm_client::testing::ScriptedLlm;
    use crate::llm_client::LlmError;
    use crate::runs::store::{RunRecord, RunStore};

    const JOB_JSON: &str = r#"{"title": "Data Engineer", "company": "Globex", "keywords": ["Python"]}"#;
    const NAME_JSON: &str = r#"{"first_name": "Ada", "last_name": "Lovelace"}"#;
    const RESUME_JSON: &str = r#"{"contact": {"name": "Ada Lovelace"}, "skills": ["Python"]}"#;

    fn state(llm: ScriptedLlm, registry: FilterRegistry) -> AppState {
        let llm = Arc::new(llm);
        AppState {
            config: Config::for_tests(),
            llm: llm.clone(),
            registry: Arc::new(registry),
            generator: Arc::new(LlmResumeGenerator::new(llm, 1, 900)),
            runs: RunStore::new(100),
        }
    }

    fn input(max_iterations: usize) -> RunInput {
        RunInput {
            resume_text: "Ada Lovelace\nData Analyst\nSkills: Python".to_string(),
            job_text: "Globex is hiring a Data Engineer. Python required.".to_string(),
            max_iterations,
            mode: ExecutionMode::Parallel,
        }
    }

    fn one_filter(behavior: Behavior) -> FilterRegistry {
        let mut builder = FilterRegistry::builder();
        builder
            .register(Arc::new(StubFilter::new("quality", 0, 0.7, behavior)))
            .unwrap();
        builder.build()
    }

    #[tokio::test]
    async fn test_successful_run_records_everything() {
        let llm = ScriptedLlm::new(vec![
            Ok(JOB_JSON.to_string()),
            Ok(NAME_JSON.to_string()),
            Ok(RESUME_JSON.to_string()),
            Ok(RESUME_JSON.to_string()),
        ]);
        let state = state(llm, one_filter(Behavior::Sequence(vec![0.2, 0.9])));
        let id = state.runs.insert(RunRecord::new(3));

        execute_run(state.clone(), id, input(3)).await;

        let run = state.runs.get(id).unwrap();
        assert_eq!(run.status, RunStatus::Complete);
        assert_eq!(run.iterations, 2);
        assert_eq!(run.passed, Some(true));
        assert!(run.current_step.is_none());
        assert_eq!(run.job_parsed.as_ref().unwrap().company, "Globex");
        assert_eq!(run.feedback.len(), 2);
        assert_eq!(run.feedback[0].iteration, 1);
        assert!(!run.feedback[0].passed);
        assert!(run.feedback[1].passed);
        assert_eq!(run.result.as_ref().unwrap().iteration, 1);
        for stage in ["parse_job", "extract_name", "optimization_loop", "total"] {
            assert!(run.timing.contains_key(stage), "missing timing for {stage}");
        }
    }

    #[tokio::test]
    async fn test_non_converging_run_completes_unpassed() {
        let llm = ScriptedLlm::new(vec![
            Ok(JOB_JSON.to_string()),
            Ok(NAME_JSON.to_string()),
            Ok(RESUME_JSON.to_string()),
        ]);
        let state = state(llm, one_filter(Behavior::Score(0.1)));
        let id = state.runs.insert(RunRecord::new(1));

        execute_run(state.clone(), id, input(1)).await;

        let run = state.runs.get(id).unwrap();
        assert_eq!(run.status, RunStatus::Complete);
        assert_eq!(run.passed, Some(false));
        assert_eq!(run.iterations, 1);
    }

    #[tokio::test]
    async fn test_job_parse_failure_marks_run_failed() {
        let llm = ScriptedLlm::new(vec![Err(LlmError::Api {
            status: 401,
            message: "invalid x-api-key".to_string(),
        })]);
        let state = state(llm, one_filter(Behavior::Score(1.0)));
        let id = state.runs.insert(RunRecord::new(3));

        execute_run(state.clone(), id, input(3)).await;

        let run = state.runs.get(id).unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.error.unwrap().starts_with("Failed to parse job posting"));
        assert!(run.result.is_none());
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_job_and_marks_failed() {
        let llm = ScriptedLlm::new(vec![
            Ok(JOB_JSON.to_string()),
            Ok(NAME_JSON.to_string()),
            Err(LlmError::Api {
                status: 400,
                message: "prompt too long".to_string(),
            }),
        ]);
        let state = state(llm, one_filter(Behavior::Score(1.0)));
        let id = state.runs.insert(RunRecord::new(3));

        execute_run(state.clone(), id, input(3)).await;

        let run = state.runs.get(id).unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.error.unwrap().contains("prompt too long"));
        assert!(run.job_parsed.is_some());
        assert!(run.feedback.is_empty());
    }
}
