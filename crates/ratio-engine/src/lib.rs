//! Financial ratio derivation from statement tables.

use report_core::{LineItem, RatioKind, RatioSet, StatementSet};

pub mod engine;
pub mod growth;
pub mod trends;

pub use engine::{RatioEngine, RatioOutcome, DEFAULT_FETCH_TIMEOUT};
pub use growth::{summarize_growth, GrowthSummary, Outlook};
pub use trends::{trend_series, TrendPoint, TrendSeries};

fn calculate_gross_margin(gross_profit: f64, revenue: f64) -> Option<f64> {
    percentage(gross_profit, revenue)
}

fn calculate_net_margin(net_income: f64, revenue: f64) -> Option<f64> {
    percentage(net_income, revenue)
}

fn calculate_current_ratio(current_assets: f64, current_liabilities: f64) -> Option<f64> {
    divide(current_assets, current_liabilities)
}

fn calculate_debt_to_equity(debt: f64, equity: f64) -> Option<f64> {
    divide(debt, equity)
}

fn calculate_asset_turnover(revenue: f64, total_assets: f64) -> Option<f64> {
    divide(revenue, total_assets)
}

fn calculate_roe(net_income: f64, equity: f64) -> Option<f64> {
    percentage(net_income, equity)
}

/// `None` on a zero denominator or a non-finite result
fn divide(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

fn percentage(numerator: f64, denominator: f64) -> Option<f64> {
    divide(numerator, denominator).map(|v| v * 100.0)
}

/// Compute one ratio from the most recent period, or `None` if it is inapplicable
pub fn derive_ratio(kind: RatioKind, statements: &StatementSet) -> Option<f64> {
    let [numerator_row, denominator_row] = kind.required_rows();
    let numerator = statements.latest(numerator_row)?;
    let denominator = statements.latest(denominator_row)?;

    match kind {
        RatioKind::GrossMargin => calculate_gross_margin(numerator, denominator),
        RatioKind::NetMargin => calculate_net_margin(numerator, denominator),
        RatioKind::CurrentRatio => calculate_current_ratio(numerator, denominator),
        RatioKind::DebtToEquity => calculate_debt_to_equity(numerator, denominator),
        RatioKind::AssetTurnover => calculate_asset_turnover(numerator, denominator),
        RatioKind::ReturnOnEquity => calculate_roe(numerator, denominator),
    }
}

/// Derive every applicable ratio. Inapplicable ratios are left out of the set.
pub fn derive_ratios(statements: &StatementSet) -> RatioSet {
    let mut ratios = RatioSet::new();
    for kind in RatioKind::ALL {
        match derive_ratio(kind, statements) {
            Some(value) => ratios.insert(kind, value),
            None => tracing::debug!("{} inapplicable: {}", kind, missing_inputs(kind, statements)),
        }
    }
    ratios
}

fn missing_inputs(kind: RatioKind, statements: &StatementSet) -> String {
    let missing: Vec<&str> = kind
        .required_rows()
        .iter()
        .filter(|row| statements.latest(**row).is_none())
        .map(LineItem::as_str)
        .collect();
    if missing.is_empty() {
        "zero denominator".to_string()
    } else {
        format!("missing {}", missing.join(", "))
    }
}
