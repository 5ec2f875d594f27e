use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::ApplicantInput;
use super::predictor::PredictorError;
use super::service::{ScoringError, ScoringService};

/// Router builder exposing the scoring endpoint under its legacy and versioned paths.
pub fn scoring_router(service: Arc<ScoringService>) -> Router {
    Router::new()
        .route("/predict_full", post(score_handler))
        .route("/api/v1/scoring", post(score_handler))
        .with_state(service)
}

pub(crate) async fn score_handler(
    State(service): State<Arc<ScoringService>>,
    axum::Json(input): axum::Json<ApplicantInput>,
) -> Response {
    let outcome = tokio::task::spawn_blocking(move || service.score(&input)).await;

    match outcome {
        Ok(Ok(result)) => (StatusCode::OK, axum::Json(result)).into_response(),
        Ok(Err(ScoringError::InvalidInput(error))) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Ok(Err(ScoringError::Predictor(error))) => {
            let status = match error {
                PredictorError::NotLoaded { .. } => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let payload = json!({
                "error": error.to_string(),
                "model": error.model(),
            });
            (status, axum::Json(payload)).into_response()
        }
        Err(join_error) => {
            error!(%join_error, "scoring task aborted");
            let payload = json!({
                "error": "scoring task aborted",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
