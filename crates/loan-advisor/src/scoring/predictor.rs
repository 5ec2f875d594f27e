use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::features::{EligibilityFeatures, FeatureRecord, PaymentFeatures, SurplusFeatures};

/// The three numeric estimators the scoring pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Eligibility,
    Payment,
    Surplus,
}

impl ModelKind {
    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::Eligibility => "eligibility",
            ModelKind::Payment => "payment",
            ModelKind::Surplus => "surplus",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure reported by a predictor port.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictorError {
    #[error("{model} predictor is not loaded")]
    NotLoaded { model: ModelKind },
    #[error("{model} predictor rejected column '{column}': {detail}")]
    SchemaMismatch {
        model: ModelKind,
        column: String,
        detail: String,
    },
    #[error("{model} predictor failed: {message}")]
    Failed { model: ModelKind, message: String },
}

impl PredictorError {
    pub fn model(&self) -> ModelKind {
        match self {
            PredictorError::NotLoaded { model }
            | PredictorError::SchemaMismatch { model, .. }
            | PredictorError::Failed { model, .. } => *model,
        }
    }
}

/// Read-only estimator safe for concurrent invocation.
pub trait Predictor<F: FeatureRecord>: Send + Sync {
    fn predict(&self, features: &F) -> Result<f64, PredictorError>;
}

/// Estimator that needs exclusive access while predicting.
pub trait ExclusivePredictor<F: FeatureRecord>: Send {
    fn predict(&mut self, features: &F) -> Result<f64, PredictorError>;
}

/// Adapts an [`ExclusivePredictor`] into a shared port by locking around each call.
///
/// Each wrapped port owns its own lock, so a slow model never blocks the others.
pub struct Serialized<P> {
    inner: Mutex<P>,
}

impl<P> Serialized<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
}

impl<F, P> Predictor<F> for Serialized<P>
where
    F: FeatureRecord,
    P: ExclusivePredictor<F>,
{
    fn predict(&self, features: &F) -> Result<f64, PredictorError> {
        let mut guard = self.inner.lock().map_err(|_| PredictorError::Failed {
            model: F::KIND,
            message: "predictor lock poisoned by an earlier panic".to_string(),
        })?;
        guard.predict(features)
    }
}

/// The three ports, ready for use once bootstrap has finished.
#[derive(Clone)]
pub struct PredictorPorts {
    pub eligibility: Arc<dyn Predictor<EligibilityFeatures>>,
    pub payment: Arc<dyn Predictor<PaymentFeatures>>,
    pub surplus: Arc<dyn Predictor<SurplusFeatures>>,
}

impl PredictorPorts {
    pub fn new(
        eligibility: Arc<dyn Predictor<EligibilityFeatures>>,
        payment: Arc<dyn Predictor<PaymentFeatures>>,
        surplus: Arc<dyn Predictor<SurplusFeatures>>,
    ) -> Self {
        Self {
            eligibility,
            payment,
            surplus,
        }
    }
}

impl fmt::Debug for PredictorPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictorPorts").finish_non_exhaustive()
    }
}
