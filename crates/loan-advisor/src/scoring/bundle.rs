//! Startup loading of the predictor bundle.
//!
//! The bundle is a JSON document holding one linear model per [`ModelKind`]. It is read
//! once, checked against the fixed feature schemas, and turned into shared read-only
//! [`PredictorPorts`].

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::features::{
    EligibilityFeatures, FeatureRecord, FeatureValue, PaymentFeatures, SurplusFeatures,
};
use super::predictor::{ModelKind, Predictor, PredictorError, PredictorPorts};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub version: String,
    #[serde(default)]
    pub trained_on: Option<NaiveDate>,
}

/// One input column of a linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinearColumn {
    Numeric {
        name: String,
        weight: f64,
    },
    /// One-hot encoded category; values missing from the map contribute nothing.
    Categorical {
        name: String,
        categories: BTreeMap<String, f64>,
    },
}

impl LinearColumn {
    pub fn name(&self) -> &str {
        match self {
            LinearColumn::Numeric { name, .. } | LinearColumn::Categorical { name, .. } => name,
        }
    }

    fn contribution(&self, model: ModelKind, value: &FeatureValue) -> Result<f64, PredictorError> {
        match (self, value) {
            (LinearColumn::Numeric { weight, .. }, FeatureValue::Number(number)) => {
                Ok(weight * number)
            }
            (LinearColumn::Categorical { categories, .. }, FeatureValue::Category(category)) => {
                Ok(categories.get(category).copied().unwrap_or(0.0))
            }
            (LinearColumn::Numeric { name, .. }, FeatureValue::Category(category)) => {
                Err(PredictorError::SchemaMismatch {
                    model,
                    column: name.clone(),
                    detail: format!("expected a number, got category '{category}'"),
                })
            }
            (LinearColumn::Categorical { name, .. }, FeatureValue::Number(number)) => {
                Err(PredictorError::SchemaMismatch {
                    model,
                    column: name.clone(),
                    detail: format!("expected a category, got number {number}"),
                })
            }
        }
    }
}

/// Intercept plus weighted columns, evaluated on a single feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub columns: Vec<LinearColumn>,
}

impl LinearModel {
    fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.name().to_string())
            .collect()
    }

    fn matches_schema(&self, schema: &[&str]) -> bool {
        self.columns.len() == schema.len()
            && self
                .columns
                .iter()
                .zip(schema)
                .all(|(column, expected)| column.name() == *expected)
    }
}

impl<F: FeatureRecord> Predictor<F> for LinearModel {
    fn predict(&self, features: &F) -> Result<f64, PredictorError> {
        let row = features.columns();
        if row.len() != self.columns.len() {
            return Err(PredictorError::SchemaMismatch {
                model: F::KIND,
                column: String::from("*"),
                detail: format!(
                    "model expects {} columns, record has {}",
                    self.columns.len(),
                    row.len()
                ),
            });
        }

        let mut total = self.intercept;
        for (column, (name, value)) in self.columns.iter().zip(&row) {
            if column.name() != *name {
                return Err(PredictorError::SchemaMismatch {
                    model: F::KIND,
                    column: (*name).to_string(),
                    detail: format!("model expects column '{}' here", column.name()),
                });
            }
            total += column.contribution(F::KIND, value)?;
        }

        Ok(total)
    }
}

/// The serialized form of the three predictors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub metadata: BundleMetadata,
    pub eligibility: Option<LinearModel>,
    pub payment: Option<LinearModel>,
    pub surplus: Option<LinearModel>,
}

impl ModelBundle {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BundleError> {
        let file = std::fs::File::open(path.as_ref())?;
        let bundle = Self::from_reader(file)?;
        info!(
            path = %path.as_ref().display(),
            version = %bundle.metadata.version,
            trained_on = ?bundle.metadata.trained_on,
            "predictor bundle loaded"
        );
        Ok(bundle)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BundleError> {
        let bundle: ModelBundle = serde_json::from_reader(reader)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Every model must be present and declare exactly its record's columns, in order.
    pub fn validate(&self) -> Result<(), BundleError> {
        check_model::<EligibilityFeatures>(self.eligibility.as_ref())?;
        check_model::<PaymentFeatures>(self.payment.as_ref())?;
        check_model::<SurplusFeatures>(self.surplus.as_ref())?;
        Ok(())
    }

    pub fn into_ports(self) -> Result<PredictorPorts, BundleError> {
        self.validate()?;
        let eligibility = self
            .eligibility
            .ok_or(BundleError::MissingModel(ModelKind::Eligibility))?;
        let payment = self
            .payment
            .ok_or(BundleError::MissingModel(ModelKind::Payment))?;
        let surplus = self
            .surplus
            .ok_or(BundleError::MissingModel(ModelKind::Surplus))?;

        Ok(PredictorPorts::new(
            Arc::new(eligibility),
            Arc::new(payment),
            Arc::new(surplus),
        ))
    }
}

fn check_model<F: FeatureRecord>(model: Option<&LinearModel>) -> Result<(), BundleError> {
    let model = model.ok_or(BundleError::MissingModel(F::KIND))?;
    if model.matches_schema(F::SCHEMA) {
        Ok(())
    } else {
        Err(BundleError::Schema {
            model: F::KIND,
            expected: F::SCHEMA.iter().map(|name| name.to_string()).collect(),
            actual: model.column_names(),
        })
    }
}

/// Startup failure while obtaining the predictors.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to read predictor bundle: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid predictor bundle: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("predictor bundle has no {0} model")]
    MissingModel(ModelKind),
    #[error("{model} model columns {actual:?} do not match schema {expected:?}")]
    Schema {
        model: ModelKind,
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::ApplicantInput;
    use crate::scoring::features::{COL_ACCOUNT_TYPE, COL_INCOME, COL_JOB_TYPE};
    use serde_json::json;

    fn numeric(name: &str, weight: f64) -> serde_json::Value {
        json!({ "name": name, "weight": weight })
    }

    fn bundle_json() -> serde_json::Value {
        let eligibility: Vec<_> = EligibilityFeatures::SCHEMA
            .iter()
            .map(|name| match *name {
                COL_JOB_TYPE => json!({ "name": name, "categories": { "government": 10.0 } }),
                COL_ACCOUNT_TYPE => json!({ "name": name, "categories": { "payroll": 5.0 } }),
                COL_INCOME => numeric(name, 0.004),
                _ => numeric(name, 0.0),
            })
            .collect();
        let payment: Vec<_> = PaymentFeatures::SCHEMA
            .iter()
            .enumerate()
            .map(|(index, name)| numeric(name, if index == 0 { 0.02 } else { 0.0 }))
            .collect();
        let surplus: Vec<_> = SurplusFeatures::SCHEMA
            .iter()
            .zip([1.0, -1.0, -1.0])
            .map(|(name, weight)| numeric(name, weight))
            .collect();

        json!({
            "metadata": { "version": "2024.1", "trained_on": "2024-03-01" },
            "eligibility": { "intercept": 30.0, "columns": eligibility },
            "payment": { "intercept": 0.0, "columns": payment },
            "surplus": { "intercept": 0.0, "columns": surplus },
        })
    }

    fn applicant() -> ApplicantInput {
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

    #[test]
    fn loads_bundle_and_predicts_with_linear_models() {
        let raw = bundle_json().to_string();
        let bundle = ModelBundle::from_reader(raw.as_bytes()).expect("bundle loads");
        assert_eq!(
            bundle.metadata.trained_on,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );

        let ports = bundle.into_ports().expect("ports build");
        let input = applicant();

        let eligibility = ports
            .eligibility
            .predict(&EligibilityFeatures::assemble(&input))
            .expect("eligibility predicts");
        assert!((eligibility - 85.0).abs() < 1e-9);

        let payment = ports
            .payment
            .predict(&PaymentFeatures::assemble(&input, 85.0))
            .expect("payment predicts");
        assert!((payment - 3_000.0).abs() < 1e-9);

        let surplus = ports
            .surplus
            .predict(&SurplusFeatures::assemble(&input, 3_000.0))
            .expect("surplus predicts");
        assert!((surplus - 6_000.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_category_contributes_nothing() {
        let raw = bundle_json().to_string();
        let ports = ModelBundle::from_reader(raw.as_bytes())
            .and_then(ModelBundle::into_ports)
            .expect("ports build");
        let input = ApplicantInput {
            job_type: "freelance".to_string(),
            ..applicant()
        };

        let eligibility = ports
            .eligibility
            .predict(&EligibilityFeatures::assemble(&input))
            .expect("eligibility predicts");
        assert!((eligibility - 75.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_reordered_columns() {
        let mut raw = bundle_json();
        let columns = raw["surplus"]["columns"]
            .as_array_mut()
            .expect("columns array");
        columns.swap(0, 1);

        let error = ModelBundle::from_reader(raw.to_string().as_bytes())
            .expect_err("reordered schema rejected");
        match error {
            BundleError::Schema { model, .. } => assert_eq!(model, ModelKind::Surplus),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_model() {
        let mut raw = bundle_json();
        raw.as_object_mut().expect("object").remove("payment");

        let error = ModelBundle::from_reader(raw.to_string().as_bytes())
            .expect_err("missing model rejected");
        assert!(matches!(
            error,
            BundleError::MissingModel(ModelKind::Payment)
        ));
    }

    #[test]
    fn numeric_column_rejects_category_values() {
        let model = LinearModel {
            intercept: 0.0,
            columns: EligibilityFeatures::SCHEMA
                .iter()
                .map(|name| LinearColumn::Numeric {
                    name: name.to_string(),
                    weight: 1.0,
                })
                .collect(),
        };

        let error = Predictor::<EligibilityFeatures>::predict(
            &model,
            &EligibilityFeatures::assemble(&applicant()),
        )
        .expect_err("category in numeric column rejected");
        match error {
            PredictorError::SchemaMismatch { model, column, .. } => {
                assert_eq!(model, ModelKind::Eligibility);
                assert_eq!(column, COL_JOB_TYPE);
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = ModelBundle::from_path("./does-not-exist.json").expect_err("io error");
        assert!(matches!(error, BundleError::Io(_)));
    }
}
