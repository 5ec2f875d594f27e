//! Applicant scoring: feature assembly, predictor ports, recommendation rules, and the
//! service that sequences them.

pub mod batch;
pub mod bundle;
pub mod domain;
pub mod features;
pub mod predictor;
pub mod recommendation;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use batch::{ApplicantCsvImporter, BatchImportError};
pub use bundle::{BundleError, BundleMetadata, LinearColumn, LinearModel, ModelBundle};
pub use domain::{
    ApplicantInput, InputError, InvestmentRecommendation, ProductRecommendation, ScoringResult,
};
pub use features::{
    EligibilityFeatures, FeatureRecord, FeatureValue, PaymentFeatures, SurplusFeatures,
};
pub use predictor::{
    ExclusivePredictor, ModelKind, Predictor, PredictorError, PredictorPorts, Serialized,
};
pub use recommendation::{suggest_investment, suggest_products};
pub use router::scoring_router;
pub use service::{ScoringError, ScoringService};
