use axum::http::{HeaderValue, Method};
use loan_advisor::error::AppError;
use loan_advisor::scoring::{ModelBundle, ScoringService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the predictor bundle once and wrap it in a shareable scoring service.
pub(crate) fn load_scoring_service(bundle_path: &Path) -> Result<Arc<ScoringService>, AppError> {
    let bundle = ModelBundle::from_path(bundle_path)?;
    let ports = bundle.into_ports()?;
    Ok(Arc::new(ScoringService::new(ports)))
}

pub(crate) fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        info!("no CORS origins configured, allowing any origin");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            })
        })
        .collect();

    info!(count = parsed.len(), "CORS origins configured");
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bundle_is_a_startup_error() {
        match load_scoring_service(Path::new("./no-such-bundle.json")) {
            Err(AppError::Bundle(_)) => {}
            Err(other) => panic!("expected bundle error, got {other:?}"),
            Ok(_) => panic!("expected bundle error"),
        }
    }

    #[test]
    fn loads_repository_demo_bundle() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../Model/full_integrated_model.json");
        assert!(load_scoring_service(&path).is_ok());
    }
}
