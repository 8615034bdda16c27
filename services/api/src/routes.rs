use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use inventory_inspection::error::AppError;
use inventory_inspection::workflows::inspection::{
    inspection_router, InspectionRepository, InspectionService, InventoryItemRef,
};
use inventory_inspection::workflows::inventory::InventoryImporter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct InventoryPreviewRequest {
    pub(crate) csv: String,
}

/// Parsed export ready to be posted as the `inventory` of a new inspection.
#[derive(Debug, Serialize)]
pub(crate) struct InventoryPreviewResponse {
    pub(crate) total_items: usize,
    pub(crate) categories: BTreeMap<String, usize>,
    pub(crate) items: Vec<InventoryItemRef>,
}

pub(crate) fn with_inspection_routes<R>(service: Arc<InspectionService<R>>) -> axum::Router
where
    R: InspectionRepository + 'static,
{
    inspection_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/inventory/preview",
            axum::routing::post(inventory_preview_endpoint),
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

pub(crate) async fn inventory_preview_endpoint(
    Json(payload): Json<InventoryPreviewRequest>,
) -> Result<Json<InventoryPreviewResponse>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let items = InventoryImporter::from_reader(reader)?;

    let mut categories = BTreeMap::new();
    for item in &items {
        *categories.entry(item.category.clone()).or_insert(0) += 1;
    }

    Ok(Json(InventoryPreviewResponse {
        total_items: items.len(),
        categories,
        items,
    }))
}
