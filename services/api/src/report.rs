use crate::infra::load_scoring_service;
use chrono::Local;
use clap::Args;
use loan_advisor::config::AppConfig;
use loan_advisor::error::AppError;
use loan_advisor::scoring::{
    ApplicantCsvImporter, ApplicantInput, InvestmentRecommendation, ProductRecommendation,
    ScoringResult,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Monthly income
    #[arg(long)]
    pub(crate) income: i64,
    /// Monthly commitments, in the same unit as income
    #[arg(long)]
    pub(crate) commitments: i64,
    /// Number of delay events reported by the credit bureau
    #[arg(long, default_value_t = 0)]
    pub(crate) delay_in_sama: i64,
    /// Employment category as known to the eligibility model
    #[arg(long)]
    pub(crate) job_type: String,
    /// Months in the current job
    #[arg(long)]
    pub(crate) months_in_job: i64,
    /// Account category as known to the eligibility model
    #[arg(long)]
    pub(crate) account_type: String,
    /// Applicant age in years
    #[arg(long)]
    pub(crate) age: i64,
    /// Requested loan amount
    #[arg(long)]
    pub(crate) principal: i64,
    /// Requested repayment term in months
    #[arg(long)]
    pub(crate) term_months: i64,
    /// Predictor bundle to load (defaults to APP_MODEL_BUNDLE)
    #[arg(long)]
    pub(crate) bundle: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl ScoreArgs {
    pub(crate) fn applicant(&self) -> ApplicantInput {
        ApplicantInput {
            income: self.income,
            commitments: self.commitments,
            delay_in_sama: self.delay_in_sama,
            job_type: self.job_type.clone(),
            months_in_job: self.months_in_job,
            account_type: self.account_type.clone(),
            age: self.age,
            principal: self.principal,
            term_months: self.term_months,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file whose headers are the applicant field names
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Predictor bundle to load (defaults to APP_MODEL_BUNDLE)
    #[arg(long)]
    pub(crate) bundle: Option<PathBuf>,
    /// Print one JSON document per applicant
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let bundle_path = resolve_bundle(args.bundle.clone())?;
    let service = load_scoring_service(&bundle_path)?;
    let applicant = args.applicant();
    let result = service.score(&applicant)?;

    if args.json {
        println!("{}", to_json(&result));
    } else {
        println!("Loan advisor report (evaluated {})", Local::now().date_naive());
        render_result(&result);
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        input,
        bundle,
        json,
    } = args;

    let bundle_path = resolve_bundle(bundle)?;
    let service = load_scoring_service(&bundle_path)?;
    let applicants = ApplicantCsvImporter::from_path(&input)?;

    if !json {
        println!(
            "Scoring {} applicant(s) from {} (evaluated {})",
            applicants.len(),
            input.display(),
            Local::now().date_naive()
        );
    }

    for (index, applicant) in applicants.iter().enumerate() {
        let result = service.score(applicant)?;
        if json {
            println!("{}", to_json(&result));
        } else {
            println!("\nApplicant #{}", index + 1);
            render_result(&result);
        }
    }

    Ok(())
}

fn resolve_bundle(explicit: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(AppConfig::load()?.models.bundle_path),
    }
}

fn to_json(result: &ScoringResult) -> String {
    serde_json::to_string(result).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

fn render_result(result: &ScoringResult) {
    for line in summary_lines(result) {
        println!("{line}");
    }
}

fn summary_lines(result: &ScoringResult) -> Vec<String> {
    let mut lines = vec![
        format!("- Eligibility: {:.1}%", result.eligibility_percent),
        format!("- Commitment ratio: {:.2}", result.commitment_ratio),
        format!("- Monthly payment: {:.1}", result.monthly_payment),
        format!("- Surplus: {:.1}", result.surplus),
    ];

    match &result.products {
        ProductRecommendation::Granted { items } => {
            lines.push("Suggested products".to_string());
            lines.extend(items.iter().map(|item| format!("  * {item}")));
        }
        ProductRecommendation::Rejected { reason } => {
            lines.push(format!("Suggested products: none ({reason})"));
        }
    }

    match &result.investment {
        InvestmentRecommendation::Granted { items } => {
            lines.push("Investment options".to_string());
            lines.extend(items.iter().map(|item| format!("  * {item}")));
        }
        InvestmentRecommendation::Insufficient { message } => {
            lines.push(format!("Investment options: {message}"));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_advisor::scoring::{suggest_investment, suggest_products};

    fn result(eligibility: f64, surplus: f64) -> ScoringResult {
        ScoringResult {
            eligibility_percent: eligibility,
            monthly_payment: 2_100.0,
            surplus,
            commitment_ratio: 0.25,
            products: suggest_products(eligibility, 0.25, 28, 10),
            investment: suggest_investment(surplus, eligibility),
        }
    }

    #[test]
    fn summary_lists_granted_items() {
        let lines = summary_lines(&result(90.0, 7_500.0));
        assert_eq!(lines[0], "- Eligibility: 90.0%");
        assert!(lines.contains(&"Suggested products".to_string()));
        assert!(lines.contains(&"Investment options".to_string()));
        assert_eq!(lines.iter().filter(|line| line.starts_with("  * ")).count(), 16);
    }

    #[test]
    fn summary_explains_rejections() {
        let lines = summary_lines(&result(45.0, 300.0));
        let products = lines
            .iter()
            .find(|line| line.starts_with("Suggested products"))
            .expect("products line");
        assert!(products.contains("age under 30"));
        assert!(products.contains("tenure under 12 months"));
        assert!(lines
            .iter()
            .any(|line| line.starts_with("Investment options: insufficient")));
    }

    #[test]
    fn json_output_is_tagged() {
        let value: serde_json::Value =
            serde_json::from_str(&to_json(&result(60.0, 1_500.0))).expect("valid json");
        assert_eq!(value["products"]["status"], "granted");
        assert_eq!(value["investment"]["items"].as_array().map(Vec::len), Some(4));
    }
}
