use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::scoring::features::{FeatureRecord, FeatureValue};
use crate::scoring::predictor::{ModelKind, Predictor, PredictorError, PredictorPorts};
use crate::scoring::{ApplicantInput, ScoringService};

/// Returns the same estimate for every row.
pub(super) struct FixedPredictor(pub(super) f64);

impl<F: FeatureRecord> Predictor<F> for FixedPredictor {
    fn predict(&self, _features: &F) -> Result<f64, PredictorError> {
        Ok(self.0)
    }
}

/// Always fails with the configured error.
pub(super) struct FailingPredictor(pub(super) PredictorError);

impl<F: FeatureRecord> Predictor<F> for FailingPredictor {
    fn predict(&self, _features: &F) -> Result<f64, PredictorError> {
        Err(self.0.clone())
    }
}

/// Records every row it receives before answering with a fixed estimate.
#[derive(Default)]
pub(super) struct RecordingPredictor {
    estimate: f64,
    rows: Mutex<Vec<Vec<(&'static str, FeatureValue)>>>,
}

impl RecordingPredictor {
    pub(super) fn returning(estimate: f64) -> Self {
        Self {
            estimate,
            rows: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn rows(&self) -> Vec<Vec<(&'static str, FeatureValue)>> {
        self.rows.lock().expect("rows mutex poisoned").clone()
    }
}

impl<F: FeatureRecord> Predictor<F> for RecordingPredictor {
    fn predict(&self, features: &F) -> Result<f64, PredictorError> {
        self.rows
            .lock()
            .expect("rows mutex poisoned")
            .push(features.columns());
        Ok(self.estimate)
    }
}

pub(super) fn fixed_ports(eligibility: f64, payment: f64, surplus: f64) -> PredictorPorts {
    PredictorPorts::new(
        Arc::new(FixedPredictor(eligibility)),
        Arc::new(FixedPredictor(payment)),
        Arc::new(FixedPredictor(surplus)),
    )
}

pub(super) fn fixed_service(eligibility: f64, payment: f64, surplus: f64) -> ScoringService {
    ScoringService::new(fixed_ports(eligibility, payment, surplus))
}

pub(super) fn not_loaded(model: ModelKind) -> PredictorError {
    PredictorError::NotLoaded { model }
}

pub(super) fn prime_applicant() -> ApplicantInput {
    ApplicantInput {
        income: 10_000,
        commitments: 1_000,
        delay_in_sama: 0,
        job_type: "government".to_string(),
        months_in_job: 24,
        account_type: "payroll".to_string(),
        age: 35,
        principal: 150_000,
        term_months: 60,
    }
}

pub(super) fn stretched_applicant() -> ApplicantInput {
    ApplicantInput {
        income: 5_000,
        commitments: 3_000,
        delay_in_sama: 2,
        job_type: "private".to_string(),
        months_in_job: 6,
        account_type: "current".to_string(),
        age: 22,
        principal: 40_000,
        term_months: 36,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
