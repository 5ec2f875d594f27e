use tracing::{debug, info, warn};

use super::domain::{round_tenth, ApplicantInput, InputError, ScoringResult};
use super::features::{EligibilityFeatures, PaymentFeatures, SurplusFeatures};
use super::predictor::{PredictorError, PredictorPorts};
use super::recommendation::{suggest_investment, suggest_products};

/// Runs the eligibility, payment and surplus predictors in dependency order and
/// derives the recommendations from their rounded outputs.
///
/// The service holds no per-call state; one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ScoringService {
    ports: PredictorPorts,
}

impl ScoringService {
    pub fn new(ports: PredictorPorts) -> Self {
        Self { ports }
    }

    /// Score one applicant. Any predictor failure aborts the whole call.
    pub fn score(&self, input: &ApplicantInput) -> Result<ScoringResult, ScoringError> {
        input.validate()?;

        let eligibility_features = EligibilityFeatures::assemble(input);
        let eligibility_percent = round_tenth(
            self.ports
                .eligibility
                .predict(&eligibility_features)
                .inspect_err(log_predictor_failure)?,
        );
        debug!(eligibility_percent, "eligibility predicted");

        let commitment_ratio = input.commitment_ratio();

        let payment_features = PaymentFeatures::assemble(input, eligibility_percent);
        let monthly_payment = round_tenth(
            self.ports
                .payment
                .predict(&payment_features)
                .inspect_err(log_predictor_failure)?,
        );
        debug!(monthly_payment, "monthly payment predicted");

        let surplus_features = SurplusFeatures::assemble(input, monthly_payment);
        let surplus = round_tenth(
            self.ports
                .surplus
                .predict(&surplus_features)
                .inspect_err(log_predictor_failure)?,
        );
        debug!(surplus, "surplus predicted");

        let products = suggest_products(
            eligibility_percent,
            commitment_ratio,
            input.age,
            input.months_in_job,
        );
        let investment = suggest_investment(surplus, eligibility_percent);

        info!(
            eligibility_percent,
            monthly_payment,
            surplus,
            commitment_ratio,
            products = products.label(),
            investment = investment.label(),
            "applicant scored"
        );

        Ok(ScoringResult {
            eligibility_percent,
            monthly_payment,
            surplus,
            commitment_ratio,
            products,
            investment,
        })
    }
}

fn log_predictor_failure(error: &PredictorError) {
    warn!(model = %error.model(), %error, "predictor call failed");
}

/// Error raised by the scoring service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid applicant input: {0}")]
    InvalidInput(#[from] InputError),
    #[error(transparent)]
    Predictor(#[from] PredictorError),
}
