use crate::cli::ServeArgs;
use crate::infra::{build_cors_layer, load_scoring_service, AppState};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_advisor::config::AppConfig;
use loan_advisor::error::AppError;
use loan_advisor::telemetry;
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
    if let Some(bundle) = args.bundle.take() {
        config.models.bundle_path = bundle;
    }

    telemetry::init(&config.telemetry)?;

    let scoring_service = load_scoring_service(&config.models.bundle_path)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(build_cors_layer(&config.server.cors_origins));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
