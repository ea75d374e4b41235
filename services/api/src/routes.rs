use crate::infra::{AppState, InMemoryAnswerStore};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use candidate_ai::assessments::export::{AnswerExportError, AnswerExportImporter};
use candidate_ai::assessments::scoring::{report_router, AnswerRepository, ReportService};
use candidate_ai::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct IngestAnswersRequest {
    /// Flat CSV answers export for a single attempt.
    pub(crate) answers_csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct IngestAnswersResponse {
    pub(crate) attempt_id: String,
    pub(crate) answers: usize,
    pub(crate) complete: bool,
}

pub(crate) fn with_report_routes<R>(service: Arc<ReportService<R>>) -> axum::Router
where
    R: AnswerRepository + 'static,
{
    report_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/assessments/attempts/:attempt_id/answers",
            axum::routing::put(ingest_answers_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn ingest_answers_endpoint(
    Path(attempt_id): Path<String>,
    Extension(store): Extension<Arc<InMemoryAnswerStore>>,
    Json(payload): Json<IngestAnswersRequest>,
) -> Result<(StatusCode, Json<IngestAnswersResponse>), AppError> {
    let reader = Cursor::new(payload.answers_csv.into_bytes());
    let snapshot = AnswerExportImporter::from_reader(reader)?;

    if snapshot.attempt_id.0 != attempt_id {
        return Err(AnswerExportError::Invalid {
            row: 1,
            reason: format!(
                "export is for attempt '{}', not '{attempt_id}'",
                snapshot.attempt_id.0
            ),
        }
        .into());
    }

    let response = IngestAnswersResponse {
        attempt_id: snapshot.attempt_id.0.clone(),
        answers: snapshot.answers.len(),
        complete: snapshot.is_complete(),
    };
    store.insert(snapshot);

    Ok((StatusCode::CREATED, Json(response)))
}
