use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{BulletinId, BulletinRequest};
use super::repository::{BulletinPublisher, BulletinRepository, RepositoryError};
use super::service::{BulletinService, BulletinServiceError};

/// Router builder exposing report card generation and lookup.
pub fn bulletin_router<R, P>(service: Arc<BulletinService<R, P>>) -> Router
where
    R: BulletinRepository + 'static,
    P: BulletinPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/bulletins",
            post(generate_handler::<R, P>).get(list_handler::<R, P>),
        )
        .route("/api/v1/bulletins/class", post(class_handler::<R, P>))
        .route(
            "/api/v1/bulletins/:bulletin_id",
            get(fetch_handler::<R, P>),
        )
        .with_state(service)
}

pub(crate) async fn generate_handler<R, P>(
    State(service): State<Arc<BulletinService<R, P>>>,
    axum::Json(request): axum::Json<BulletinRequest>,
) -> Response
where
    R: BulletinRepository + 'static,
    P: BulletinPublisher + 'static,
{
    match service.generate(request) {
        Ok(report_card) => (StatusCode::CREATED, axum::Json(report_card)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn class_handler<R, P>(
    State(service): State<Arc<BulletinService<R, P>>>,
    axum::Json(requests): axum::Json<Vec<BulletinRequest>>,
) -> Response
where
    R: BulletinRepository + 'static,
    P: BulletinPublisher + 'static,
{
    match service.generate_class(requests) {
        Ok(report) => (StatusCode::CREATED, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassQuery {
    pub(crate) class_label: String,
    pub(crate) term: u8,
}

pub(crate) async fn list_handler<R, P>(
    State(service): State<Arc<BulletinService<R, P>>>,
    Query(query): Query<ClassQuery>,
) -> Response
where
    R: BulletinRepository + 'static,
    P: BulletinPublisher + 'static,
{
    match service.list_for_class(&query.class_label, query.term) {
        Ok(report_cards) => (StatusCode::OK, axum::Json(report_cards)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R, P>(
    State(service): State<Arc<BulletinService<R, P>>>,
    Path(bulletin_id): Path<String>,
) -> Response
where
    R: BulletinRepository + 'static,
    P: BulletinPublisher + 'static,
{
    let id = BulletinId(bulletin_id);
    match service.get(&id) {
        Ok(report_card) => (StatusCode::OK, axum::Json(report_card)).into_response(),
        Err(BulletinServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "bulletin_id": id.0,
                "error": "bulletin not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

fn error_response(error: BulletinServiceError) -> Response {
    let status = match &error {
        BulletinServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BulletinServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        BulletinServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        BulletinServiceError::Repository(RepositoryError::Unavailable(_)) => {
            tracing::error!(%error, "bulletin request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
