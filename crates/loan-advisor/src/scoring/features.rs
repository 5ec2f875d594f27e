//! Fixed-shape feature records handed to the predictors.
//!
//! Column names and their order are the contract the models were trained against, so
//! they are spelled exactly as in the training data and never derived from field names.

use serde::Serialize;

use super::domain::ApplicantInput;
use super::predictor::ModelKind;

pub const COL_INCOME: &str = "الدخل";
pub const COL_COMMITMENTS: &str = "الالتزامات";
pub const COL_DELAY_IN_SAMA: &str = "تأخير في سمة";
pub const COL_JOB_TYPE: &str = "نوع الوظيفة";
pub const COL_MONTHS_IN_JOB: &str = "مدة العمل";
pub const COL_ACCOUNT_TYPE: &str = "نوع الحساب";
pub const COL_AGE: &str = "العمر";
pub const COL_PRINCIPAL: &str = "المبلغ";
pub const COL_TERM_MONTHS: &str = "مدة السداد";
pub const COL_ELIGIBILITY: &str = "نسبة التأهيل";
pub const COL_MONTHLY_PAYMENT: &str = "الدفعة الشهرية";

/// Single cell of a feature row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

/// A one-row feature table with a fixed, ordered schema.
pub trait FeatureRecord: Send + Sync {
    const KIND: ModelKind;
    const SCHEMA: &'static [&'static str];

    /// Values in `SCHEMA` order.
    fn values(&self) -> Vec<FeatureValue>;

    fn columns(&self) -> Vec<(&'static str, FeatureValue)> {
        Self::SCHEMA.iter().copied().zip(self.values()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityFeatures {
    pub income: i64,
    pub commitments: i64,
    pub delay_in_sama: i64,
    pub job_type: String,
    pub months_in_job: i64,
    pub account_type: String,
    pub age: i64,
}

impl EligibilityFeatures {
    pub fn assemble(input: &ApplicantInput) -> Self {
        Self {
            income: input.income,
            commitments: input.commitments,
            delay_in_sama: input.delay_in_sama,
            job_type: input.job_type.clone(),
            months_in_job: input.months_in_job,
            account_type: input.account_type.clone(),
            age: input.age,
        }
    }
}

impl FeatureRecord for EligibilityFeatures {
    const KIND: ModelKind = ModelKind::Eligibility;
    const SCHEMA: &'static [&'static str] = &[
        COL_INCOME,
        COL_COMMITMENTS,
        COL_DELAY_IN_SAMA,
        COL_JOB_TYPE,
        COL_MONTHS_IN_JOB,
        COL_ACCOUNT_TYPE,
        COL_AGE,
    ];

    fn values(&self) -> Vec<FeatureValue> {
        vec![
            FeatureValue::Number(self.income as f64),
            FeatureValue::Number(self.commitments as f64),
            FeatureValue::Number(self.delay_in_sama as f64),
            FeatureValue::Category(self.job_type.clone()),
            FeatureValue::Number(self.months_in_job as f64),
            FeatureValue::Category(self.account_type.clone()),
            FeatureValue::Number(self.age as f64),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentFeatures {
    pub principal: i64,
    pub term_months: i64,
    pub age: i64,
    pub income: i64,
    pub eligibility_percent: f64,
}

impl PaymentFeatures {
    pub fn assemble(input: &ApplicantInput, eligibility_percent: f64) -> Self {
        Self {
            principal: input.principal,
            term_months: input.term_months,
            age: input.age,
            income: input.income,
            eligibility_percent,
        }
    }
}

impl FeatureRecord for PaymentFeatures {
    const KIND: ModelKind = ModelKind::Payment;
    const SCHEMA: &'static [&'static str] = &[
        COL_PRINCIPAL,
        COL_TERM_MONTHS,
        COL_AGE,
        COL_INCOME,
        COL_ELIGIBILITY,
    ];

    fn values(&self) -> Vec<FeatureValue> {
        vec![
            FeatureValue::Number(self.principal as f64),
            FeatureValue::Number(self.term_months as f64),
            FeatureValue::Number(self.age as f64),
            FeatureValue::Number(self.income as f64),
            FeatureValue::Number(self.eligibility_percent),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurplusFeatures {
    pub income: i64,
    pub commitments: i64,
    pub monthly_payment: f64,
}

impl SurplusFeatures {
    pub fn assemble(input: &ApplicantInput, monthly_payment: f64) -> Self {
        Self {
            income: input.income,
            commitments: input.commitments,
            monthly_payment,
        }
    }
}

impl FeatureRecord for SurplusFeatures {
    const KIND: ModelKind = ModelKind::Surplus;
    const SCHEMA: &'static [&'static str] = &[COL_INCOME, COL_COMMITMENTS, COL_MONTHLY_PAYMENT];

    fn values(&self) -> Vec<FeatureValue> {
        vec![
            FeatureValue::Number(self.income as f64),
            FeatureValue::Number(self.commitments as f64),
            FeatureValue::Number(self.monthly_payment),
        ]
    }
}
