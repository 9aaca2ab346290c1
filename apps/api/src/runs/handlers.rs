use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::optimization::{ExecutionMode, MAX_ITERATIONS_LIMIT};
use crate::runs::executor::{execute_run, RunInput};
use crate::runs::store::{RunRecord, RunStatus, RunSummary};
use crate::state::AppState;

fn default_parallel() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub resume_text: String,
    pub job_text: String,
    /// Falls back to `DEFAULT_MAX_ITERATIONS` when omitted.
    #[serde(default)]
    pub max_iterations: Option<usize>,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

#[derive(Debug, Serialize)]
pub struct OptimizeStartResponse {
    pub run_id: Uuid,
    pub status: RunStatus,
}

#[derive(Debug, Serialize)]
pub struct RunListResponse {
    pub runs: Vec<RunSummary>,
}

/// POST /api/v1/optimize
/// Validates the request, records a pending run and starts it in the background.
pub async fn handle_start_optimization(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OptimizeStartResponse>), AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let input = validate_request(req, state.config.default_max_iterations)?;

    let run_id = state.runs.insert(RunRecord::new(input.max_iterations));
    info!(
        "[{run_id}] Run accepted (max_iterations={}, mode={:?})",
        input.max_iterations, input.mode
    );

    tokio::spawn(execute_run(state.clone(), run_id, input));

    Ok((
        StatusCode::ACCEPTED,
        Json(OptimizeStartResponse {
            run_id,
            status: RunStatus::Pending,
        }),
    ))
}

/// GET /api/v1/optimize
pub async fn handle_list_runs(State(state): State<AppState>) -> Json<RunListResponse> {
    Json(RunListResponse {
        runs: state.runs.list(),
    })
}

/// GET /api/v1/optimize/:id
pub async fn handle_get_run(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RunRecord>, AppError> {
    state
        .runs
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Optimization run {id} not found")))
}

fn validate_request(req: OptimizeRequest, default_max_iterations: usize) -> Result<RunInput, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text must not be empty".to_string()));
    }

    let job_text = req.job_text.trim();
    if job_text.is_empty() {
        return Err(AppError::Validation("job_text must not be empty".to_string()));
    }
    if job_text.starts_with("http://") || job_text.starts_with("https://") {
        return Err(AppError::Validation(
            "Job URLs are not fetched; paste the job posting text instead".to_string(),
        ));
    }

    let max_iterations = req.max_iterations.unwrap_or(default_max_iterations);
    if !(1..=MAX_ITERATIONS_LIMIT).contains(&max_iterations) {
        return Err(AppError::Validation(format!(
            "max_iterations must be between 1 and {MAX_ITERATIONS_LIMIT}, got {max_iterations}"
        )));
    }

    Ok(RunInput {
        resume_text: req.resume_text,
        job_text: job_text.to_string(),
        max_iterations,
        mode: ExecutionMode::from_parallel(req.parallel),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(job_text: &str, max_iterations: Option<usize>) -> OptimizeRequest {
        OptimizeRequest {
            resume_text: "Ada Lovelace".to_string(),
            job_text: job_text.to_string(),
            max_iterations,
            parallel: true,
        }
    }

    #[test]
    fn test_request_defaults() {
        let req: OptimizeRequest =
            serde_json::from_str(r#"{"resume_text": "cv", "job_text": "job"}"#).unwrap();
        assert!(req.parallel);
        assert!(req.max_iterations.is_none());

        let input = validate_request(req, 5).unwrap();
        assert_eq!(input.max_iterations, 5);
        assert_eq!(input.mode, ExecutionMode::Parallel);
    }

    #[test]
    fn test_sequential_flag_maps_to_mode() {
        let mut req = request("Data Engineer at Globex", Some(2));
        req.parallel = false;
        assert_eq!(validate_request(req, 5).unwrap().mode, ExecutionMode::Sequential);
    }

    #[test]
    fn test_iteration_bounds() {
        assert!(validate_request(request("job", Some(1)), 5).is_ok());
        assert!(validate_request(request("job", Some(10)), 5).is_ok());
        assert!(matches!(
            validate_request(request("job", Some(0)), 5),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_request(request("job", Some(11)), 5),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_url_job_input_is_rejected() {
        let err = validate_request(request("  https://jobs.example.com/123", None), 5).unwrap_err();
        assert!(err.to_string().contains("paste the job posting text"));
    }

    #[test]
    fn test_blank_inputs_are_rejected() {
        assert!(validate_request(request("   ", None), 5).is_err());
        let mut req = request("job", None);
        req.resume_text = "\n".to_string();
        assert!(validate_request(req, 5).is_err());
    }
}
