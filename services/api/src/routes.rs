use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use ecole_grades::config::SchoolConfig;
use ecole_grades::grading::bulletin::{
    bulletin_router, BulletinPublisher, BulletinRepository, BulletinService,
};
use ecole_grades::grading::grading_router;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_grading_routes<R, P>(service: Arc<BulletinService<R, P>>) -> axum::Router
where
    R: BulletinRepository + 'static,
    P: BulletinPublisher + 'static,
{
    let school = service.school().clone();

    bulletin_router(service)
        .merge(grading_router())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/school",
            axum::routing::get(move || school_endpoint(school.clone())),
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

#[derive(Debug, Serialize)]
pub(crate) struct SchoolView {
    name: String,
    academic_year: String,
}

pub(crate) async fn school_endpoint(school: SchoolConfig) -> Json<SchoolView> {
    Json(SchoolView {
        name: school.name,
        academic_year: school.academic_year,
    })
}
