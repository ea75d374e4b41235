use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::AttemptId;
use super::repository::AnswerRepository;
use super::service::{ReportError, ReportService};

/// Router builder exposing the report endpoints for one service instance.
pub fn report_router<R>(service: Arc<ReportService<R>>) -> Router
where
    R: AnswerRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments/attempts/:attempt_id/report",
            get(report_handler::<R>),
        )
        .route(
            "/api/v1/assessments/attempts/:attempt_id/report/summary",
            get(summary_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    Path(attempt_id): Path<String>,
) -> Response
where
    R: AnswerRepository + 'static,
{
    let id = AttemptId(attempt_id);
    match service.generate(&id).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    Path(attempt_id): Path<String>,
) -> Response
where
    R: AnswerRepository + 'static,
{
    let id = AttemptId(attempt_id);
    match service.generate(&id).await {
        Ok(report) => (StatusCode::OK, axum::Json(report.summary())).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ReportError) -> Response {
    let status = match &error {
        ReportError::AttemptNotFound(_) => StatusCode::NOT_FOUND,
        ReportError::AttemptIncomplete(_) => StatusCode::CONFLICT,
        ReportError::InvalidAnswers(_, _) => StatusCode::UNPROCESSABLE_ENTITY,
        ReportError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
