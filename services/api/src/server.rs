use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryBulletinPublisher, InMemoryBulletinRepository};
use crate::routes::with_grading_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ecole_grades::config::AppConfig;
use ecole_grades::error::AppError;
use ecole_grades::grading::bulletin::BulletinService;
use ecole_grades::telemetry;
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

    let repository = Arc::new(InMemoryBulletinRepository::default());
    let publisher = Arc::new(InMemoryBulletinPublisher::default());
    let bulletin_service = Arc::new(BulletinService::new(
        repository,
        publisher,
        config.school.clone(),
    ));

    let app = with_grading_routes(bulletin_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        school = %config.school.name,
        academic_year = %config.school.academic_year,
        "grade service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
