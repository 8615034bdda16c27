use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::commands::InspectionCommand;
use super::domain::{InspectionError, InspectionId};
use super::record::{CompletionWarning, Inspection};
use super::repository::{InspectionRepository, RepositoryError};
use super::service::{InspectionService, InspectionServiceError, StartInspection};

#[derive(Debug, Deserialize)]
pub(crate) struct CommandRequest {
    pub(crate) expected_version: u64,
    pub(crate) command: InspectionCommand,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransitionRequest {
    pub(crate) expected_version: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletionResponse {
    pub(crate) inspection: Inspection,
    pub(crate) warnings: Vec<CompletionWarning>,
}

/// Router builder exposing the inspection session over HTTP.
pub fn inspection_router<R>(service: Arc<InspectionService<R>>) -> Router
where
    R: InspectionRepository + 'static,
{
    Router::new()
        .route("/api/v1/inspections", post(start_handler::<R>))
        .route("/api/v1/inspections/:inspection_id", get(get_handler::<R>))
        .route(
            "/api/v1/inspections/:inspection_id/commands",
            post(command_handler::<R>),
        )
        .route(
            "/api/v1/inspections/:inspection_id/complete",
            post(complete_handler::<R>),
        )
        .route(
            "/api/v1/inspections/:inspection_id/cancel",
            post(cancel_handler::<R>),
        )
        .route(
            "/api/v1/inspections/:inspection_id/report",
            get(report_handler::<R>),
        )
        .route(
            "/api/v1/apartments/:apartment_id/inspections",
            get(history_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn start_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    axum::Json(request): axum::Json<StartInspection>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.start(request, Utc::now()) {
        Ok(inspection) => (StatusCode::CREATED, axum::Json(inspection)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.get(&InspectionId(inspection_id)) {
        Ok(inspection) => (StatusCode::OK, axum::Json(inspection)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Every inspection recorded for one apartment, oldest first.
pub(crate) async fn history_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(apartment_id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.history(&apartment_id) {
        Ok(inspections) => (StatusCode::OK, axum::Json(inspections)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn command_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
    axum::Json(request): axum::Json<CommandRequest>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    let id = InspectionId(inspection_id);
    match service.apply(&id, request.expected_version, request.command) {
        Ok(inspection) => (StatusCode::OK, axum::Json(inspection)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    let id = InspectionId(inspection_id);
    match service.complete(&id, request.expected_version, Utc::now()) {
        Ok((inspection, report)) => {
            let body = CompletionResponse {
                inspection,
                warnings: report.warnings,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cancel_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    let id = InspectionId(inspection_id);
    match service.cancel(&id, request.expected_version, Utc::now()) {
        Ok(inspection) => (StatusCode::OK, axum::Json(inspection)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.report(&InspectionId(inspection_id), Utc::now()) {
        Ok(document) => (StatusCode::OK, axum::Json(document)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_status(error: &InspectionServiceError) -> StatusCode {
    match error {
        InspectionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        InspectionServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        InspectionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        InspectionServiceError::Inspection(
            InspectionError::InvalidTransition { .. } | InspectionError::RecordFrozen { .. },
        ) => StatusCode::CONFLICT,
        InspectionServiceError::Inspection(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn error_response(error: InspectionServiceError) -> Response {
    let status = error_status(&error);
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
