use serde::{Deserialize, Serialize};

/// Raw applicant attributes supplied by the caller for one scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantInput {
    pub income: i64,
    pub commitments: i64,
    pub delay_in_sama: i64,
    pub job_type: String,
    pub months_in_job: i64,
    pub account_type: String,
    pub age: i64,
    pub principal: i64,
    pub term_months: i64,
}

impl ApplicantInput {
    /// Check the field constraints the scoring pipeline relies on.
    ///
    /// Categorical values are only checked for presence; their valid sets belong to
    /// the trained predictors.
    pub fn validate(&self) -> Result<(), InputError> {
        let non_negative = [
            ("income", self.income),
            ("commitments", self.commitments),
            ("delay_in_sama", self.delay_in_sama),
            ("months_in_job", self.months_in_job),
            ("principal", self.principal),
        ];
        for (field, value) in non_negative {
            if value < 0 {
                return Err(InputError::Negative { field, value });
            }
        }

        let positive = [("age", self.age), ("term_months", self.term_months)];
        for (field, value) in positive {
            if value <= 0 {
                return Err(InputError::NotPositive { field, value });
            }
        }

        let categorical = [
            ("job_type", &self.job_type),
            ("account_type", &self.account_type),
        ];
        for (field, value) in categorical {
            if value.trim().is_empty() {
                return Err(InputError::Empty { field });
            }
        }

        Ok(())
    }

    /// Commitments as a share of income; zero income yields zero.
    pub fn commitment_ratio(&self) -> f64 {
        if self.income > 0 {
            self.commitments as f64 / self.income as f64
        } else {
            0.0
        }
    }
}

/// Violated applicant constraint, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: i64 },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

impl InputError {
    pub fn field(&self) -> &'static str {
        match self {
            InputError::Negative { field, .. }
            | InputError::NotPositive { field, .. }
            | InputError::Empty { field } => field,
        }
    }
}

/// Product offer derived from the eligibility percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProductRecommendation {
    Granted { items: Vec<String> },
    Rejected { reason: String },
}

impl ProductRecommendation {
    pub fn label(&self) -> &'static str {
        match self {
            ProductRecommendation::Granted { .. } => "granted",
            ProductRecommendation::Rejected { .. } => "rejected",
        }
    }

    pub fn items(&self) -> Option<&[String]> {
        match self {
            ProductRecommendation::Granted { items } => Some(items),
            ProductRecommendation::Rejected { .. } => None,
        }
    }
}

/// Investment options derived from the surplus and eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvestmentRecommendation {
    Granted { items: Vec<String> },
    Insufficient { message: String },
}

impl InvestmentRecommendation {
    pub fn label(&self) -> &'static str {
        match self {
            InvestmentRecommendation::Granted { .. } => "granted",
            InvestmentRecommendation::Insufficient { .. } => "insufficient",
        }
    }

    pub fn items(&self) -> Option<&[String]> {
        match self {
            InvestmentRecommendation::Granted { items } => Some(items),
            InvestmentRecommendation::Insufficient { .. } => None,
        }
    }
}

/// Outcome of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub eligibility_percent: f64,
    pub monthly_payment: f64,
    pub surplus: f64,
    pub commitment_ratio: f64,
    pub products: ProductRecommendation,
    pub investment: InvestmentRecommendation,
}

/// Round a predictor output to one decimal place, sending exact halves to the even digit.
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
