use crate::cli::ServeArgs;
use crate::infra::{load_rubric, AppState, InMemoryAnswerStore};
use crate::routes::with_report_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use candidate_ai::config::AppConfig;
use candidate_ai::error::AppError;
use candidate_ai::telemetry;
use candidate_ai::assessments::scoring::ReportService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let rubric = load_rubric(&config.scoring)?;
    let store = Arc::new(InMemoryAnswerStore::default());
    let report_service = Arc::new(ReportService::new(store.clone(), rubric));

    let app = with_report_routes(report_service)
        .layer(Extension(app_state))
        .layer(Extension(store))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "assessment scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
