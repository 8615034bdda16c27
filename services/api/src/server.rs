use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryInspectionRepository};
use crate::routes::with_inspection_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use inventory_inspection::config::AppConfig;
use inventory_inspection::error::AppError;
use inventory_inspection::telemetry;
use inventory_inspection::workflows::inspection::InspectionService;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryInspectionRepository::default());
    let inspection_service = Arc::new(InspectionService::new(repository, &config.inspection));

    let app = with_inspection_routes(inspection_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_areas = config.inspection.default_areas.len(),
        "inspection engine ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
