//! In-memory run store. Finished runs are kept up to a configured count.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::models::{FilterResult, JobPosting, OptimizedResume, ValidationResult};

/// Run lifecycle: `pending → parse_job → generate → validate → refine → complete | failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    ParseJob,
    Generate,
    Validate,
    Refine,
    Complete,
    Failed,
}

impl RunStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, RunStatus::Complete | RunStatus::Failed)
    }
}

/// Verdict of one iteration as reported to clients. `iteration` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationFeedback {
    pub iteration: usize,
    pub passed: bool,
    pub results: Vec<FilterResult>,
}

impl IterationFeedback {
    pub fn from_verdict(index: usize, verdict: &ValidationResult) -> Self {
        Self {
            iteration: index + 1,
            passed: verdict.passed(),
            results: verdict.results().to_vec(),
        }
    }
}

/// The parsed-job fields shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub title: String,
    pub company: String,
    pub location: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub keywords: Vec<String>,
}

impl From<&JobPosting> for JobSummary {
    fn from(job: &JobPosting) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            requirements: job.requirements.clone(),
            responsibilities: job.responsibilities.clone(),
            keywords: job.keywords.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub id: Uuid,
    pub status: RunStatus,
    pub current_step: Option<String>,
    pub iterations: usize,
    pub max_iterations: usize,
    pub job_parsed: Option<JobSummary>,
    pub feedback: Vec<IterationFeedback>,
    pub result: Option<OptimizedResume>,
    pub passed: Option<bool>,
    pub error: Option<String>,
    /// Seconds per stage: `parse_job`, `extract_name`, `optimization_loop`, `total`.
    pub timing: HashMap<String, f64>,
    pub created_at: DateTime<Utc>,
}

impl RunRecord {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: RunStatus::Pending,
            current_step: None,
            iterations: 0,
            max_iterations,
            job_parsed: None,
            feedback: Vec::new(),
            result: None,
            passed: None,
            error: None,
            timing: HashMap::new(),
            created_at: Utc::now(),
        }
    }
}

/// List-view projection of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub id: Uuid,
    pub status: RunStatus,
    pub job_title: Option<String>,
    pub job_company: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&RunRecord> for RunSummary {
    fn from(run: &RunRecord) -> Self {
        Self {
            id: run.id,
            status: run.status,
            job_title: run.job_parsed.as_ref().map(|j| j.title.clone()),
            job_company: run.job_parsed.as_ref().map(|j| j.company.clone()),
            created_at: run.created_at,
        }
    }
}

/// Shared, cloneable handle to the run table.
///
/// Lock sections never await, so a std lock is enough. A poisoned lock is recovered:
/// every mutation leaves the record in a readable state.
///
/// Only the newest `retain_finished` complete or failed runs are kept; older ones are
/// evicted on insert. Runs still in progress are never evicted.
#[derive(Clone)]
pub struct RunStore {
    runs: Arc<RwLock<HashMap<Uuid, RunRecord>>>,
    retain_finished: usize,
}

impl RunStore {
    pub fn new(retain_finished: usize) -> Self {
        Self {
            runs: Arc::default(),
            retain_finished,
        }
    }

    pub fn insert(&self, record: RunRecord) -> Uuid {
        let id = record.id;
        let mut runs = self.runs.write().unwrap_or_else(PoisonError::into_inner);
        runs.insert(id, record);
        let evicted = evict_finished(&mut runs, self.retain_finished);
        if evicted > 0 {
            debug!("Evicted {evicted} finished run(s), {} remain", runs.len());
        }
        id
    }

    pub fn get(&self, id: Uuid) -> Option<RunRecord> {
        self.runs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Applies `f` to the record in place. Returns false if the run does not exist.
    pub fn update(&self, id: Uuid, f: impl FnOnce(&mut RunRecord)) -> bool {
        let mut runs = self.runs.write().unwrap_or_else(PoisonError::into_inner);
        match runs.get_mut(&id) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }

    /// All runs, newest first.
    pub fn list(&self) -> Vec<RunSummary> {
        let runs = self.runs.read().unwrap_or_else(PoisonError::into_inner);
        let mut summaries: Vec<RunSummary> = runs.values().map(RunSummary::from).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }
}

/// Drops the oldest finished runs beyond `retain`. Returns how many were removed.
fn evict_finished(runs: &mut HashMap<Uuid, RunRecord>, retain: usize) -> usize {
    let mut finished: Vec<(DateTime<Utc>, Uuid)> = runs
        .values()
        .filter(|run| run.status.is_finished())
        .map(|run| (run.created_at, run.id))
        .collect();
    if finished.len() <= retain {
        return 0;
    }

    finished.sort_unstable();
    let excess = finished.len() - retain;
    for (_, id) in finished.into_iter().take(excess) {
        runs.remove(&id);
    }
    excess
}
