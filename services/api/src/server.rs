use crate::cli::ServeArgs;
use crate::infra::{AppState, LogNotificationSender};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_board::config::AppConfig;
use job_board::error::AppError;
use job_board::jobs::{JobBoardState, JobLifecycleService, MemoryJobStore};
use job_board::telemetry;
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

    let store = Arc::new(MemoryJobStore::new());
    let service = Arc::new(JobLifecycleService::new(store));
    let notifier = Arc::new(LogNotificationSender);
    let board_state = JobBoardState {
        service,
        notifier,
        admin: config.admin.clone(),
        operator_email: config.notifications.operator_email.clone(),
    };

    let app = with_service_routes(board_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job board service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
