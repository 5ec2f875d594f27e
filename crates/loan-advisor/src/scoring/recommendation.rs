use super::domain::{InvestmentRecommendation, ProductRecommendation};

pub const PRODUCT_CATALOG: [&str; 8] = [
    "Infinite credit card",
    "Murabaha personal finance",
    "Home finance",
    "Signature credit card",
    "Savings account",
    "Auto finance",
    "Investment sukuk",
    "Investment funds",
];

pub const INVESTMENT_CATALOG: [&str; 8] = [
    "Savings account (2%)",
    "Sharia-compliant sukuk (3-4%)",
    "Real estate funds (5%+)",
    "Equities (10%)",
    "Current account (1%)",
    "Money market funds (4%)",
    "Gold (medium risk)",
    "International funds (6%+)",
];

/// Number of catalog entries offered to mid-band applicants.
const PARTIAL_OFFER: usize = 4;

pub const REJECTION_PREFIX: &str = "not eligible due to: ";
pub const REASON_SEPARATOR: &str = "; ";
pub const REASON_COMMITMENTS: &str = "commitment ratio exceeds 40% of income";
pub const REASON_AGE: &str = "age under 30";
pub const REASON_TENURE: &str = "tenure under 12 months";
pub const REASON_UNSPECIFIED: &str = "reason unspecified - verify data";
pub const INSUFFICIENT_SURPLUS: &str = "insufficient - focus on savings";

/// Map the eligibility band to a product offer or a rejection explanation.
///
/// Thresholds are strict: an applicant sitting exactly on 80, 50, 0.4, 30 or 12
/// falls into the lower band.
pub fn suggest_products(
    eligibility_percent: f64,
    commitment_ratio: f64,
    age: i64,
    months_in_job: i64,
) -> ProductRecommendation {
    if eligibility_percent > 80.0 {
        return ProductRecommendation::Granted {
            items: catalog_prefix(&PRODUCT_CATALOG, PRODUCT_CATALOG.len()),
        };
    }

    if eligibility_percent > 50.0 {
        return ProductRecommendation::Granted {
            items: catalog_prefix(&PRODUCT_CATALOG, PARTIAL_OFFER),
        };
    }

    let mut reasons = Vec::new();
    if commitment_ratio > 0.4 {
        reasons.push(REASON_COMMITMENTS);
    }
    if age < 30 {
        reasons.push(REASON_AGE);
    }
    if months_in_job < 12 {
        reasons.push(REASON_TENURE);
    }

    let detail = if reasons.is_empty() {
        REASON_UNSPECIFIED.to_string()
    } else {
        reasons.join(REASON_SEPARATOR)
    };

    ProductRecommendation::Rejected {
        reason: format!("{REJECTION_PREFIX}{detail}"),
    }
}

/// Map surplus and eligibility to investment options. Both conditions of a band must hold.
pub fn suggest_investment(surplus: f64, eligibility_percent: f64) -> InvestmentRecommendation {
    if surplus > 5000.0 && eligibility_percent > 80.0 {
        InvestmentRecommendation::Granted {
            items: catalog_prefix(&INVESTMENT_CATALOG, INVESTMENT_CATALOG.len()),
        }
    } else if surplus > 1000.0 && eligibility_percent > 50.0 {
        InvestmentRecommendation::Granted {
            items: catalog_prefix(&INVESTMENT_CATALOG, PARTIAL_OFFER),
        }
    } else {
        InvestmentRecommendation::Insufficient {
            message: INSUFFICIENT_SURPLUS.to_string(),
        }
    }
}

fn catalog_prefix(catalog: &[&str], count: usize) -> Vec<String> {
    catalog
        .iter()
        .take(count)
        .map(|label| label.to_string())
        .collect()
}
