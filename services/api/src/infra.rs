use async_trait::async_trait;
use candidate_ai::assessments::scoring::{
    AnswerRepository, AttemptId, AttemptSnapshot, RepositoryError, ScoringRubric,
};
use candidate_ai::config::ScoringConfig;
use candidate_ai::error::AppError;
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Answer store backing the service. Snapshots arrive whole via the ingest
/// endpoint and are replaced wholesale on re-ingest.
#[derive(Default)]
pub(crate) struct InMemoryAnswerStore {
    snapshots: Mutex<HashMap<AttemptId, AttemptSnapshot>>,
}

impl InMemoryAnswerStore {
    pub(crate) fn insert(&self, snapshot: AttemptSnapshot) {
        let mut guard = self.snapshots.lock().expect("answer store mutex poisoned");
        guard.insert(snapshot.attempt_id.clone(), snapshot);
    }
}

#[async_trait]
impl AnswerRepository for InMemoryAnswerStore {
    async fn attempt_snapshot(&self, id: &AttemptId) -> Result<AttemptSnapshot, RepositoryError> {
        let guard = self.snapshots.lock().expect("answer store mutex poisoned");
        guard.get(id).cloned().ok_or(RepositoryError::NotFound)
    }
}

/// Load the rubric named by configuration, falling back to the built-in
/// standard rubric when no path is configured.
pub(crate) fn load_rubric(config: &ScoringConfig) -> Result<ScoringRubric, AppError> {
    match &config.rubric_path {
        Some(path) => {
            let rubric = ScoringRubric::from_path(path)?;
            info!(path = %path.display(), version = %rubric.version, "loaded scoring rubric");
            Ok(rubric)
        }
        None => {
            let rubric = ScoringRubric::standard();
            info!(version = %rubric.version, "using built-in standard rubric");
            Ok(rubric)
        }
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}
