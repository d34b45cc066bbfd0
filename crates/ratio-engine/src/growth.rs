//! Year-over-year headline figures and a coarse outlook.

use report_core::{LineItem, StatementSet};
use serde::{Deserialize, Serialize};

/// Revenue growth above this (percent) counts towards a strong outlook
const STRONG_REVENUE_GROWTH: f64 = 10.0;
/// Profit growth above this (percent) counts towards a strong outlook
const STRONG_PROFIT_GROWTH: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outlook {
    /// Revenue and profit both growing quickly
    Strong,
    /// Revenue and profit both growing
    Stable,
    NeedsAttention,
}

impl Outlook {
    pub fn from_growth(revenue_growth: f64, profit_growth: f64) -> Self {
        if revenue_growth > STRONG_REVENUE_GROWTH && profit_growth > STRONG_PROFIT_GROWTH {
            Outlook::Strong
        } else if revenue_growth > 0.0 && profit_growth > 0.0 {
            Outlook::Stable
        } else {
            Outlook::NeedsAttention
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Outlook::Strong => "Financials look strong: revenue and profit are both growing quickly",
            Outlook::Stable => "Financials look stable: revenue and profit keep growing",
            Outlook::NeedsAttention => "Financials need attention: look further before drawing conclusions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSummary {
    pub latest_period: Option<String>,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub revenue_growth_pct: Option<f64>,
    pub profit_growth_pct: Option<f64>,
    /// Total liabilities as a percentage of total assets
    pub debt_ratio_pct: Option<f64>,
    pub outlook: Option<Outlook>,
}

/// (current / prior - 1) * 100, `None` if either side is missing or prior is zero
fn growth_pct(statements: &StatementSet, item: LineItem) -> Option<f64> {
    let current = statements.get(item, 0)?;
    let prior = statements.get(item, 1)?;
    if prior == 0.0 {
        return None;
    }
    let growth = (current / prior - 1.0) * 100.0;
    growth.is_finite().then_some(growth)
}

pub fn summarize_growth(statements: &StatementSet) -> GrowthSummary {
    let revenue_growth_pct = growth_pct(statements, LineItem::TotalRevenue);
    let profit_growth_pct = growth_pct(statements, LineItem::NetIncome);

    let debt_ratio_pct = match (
        statements.latest(LineItem::TotalLiabilities),
        statements.latest(LineItem::TotalAssets),
    ) {
        (Some(liabilities), Some(assets)) if assets != 0.0 => Some(liabilities / assets * 100.0),
        _ => None,
    };

    let outlook = match (revenue_growth_pct, profit_growth_pct) {
        (Some(revenue), Some(profit)) => Some(Outlook::from_growth(revenue, profit)),
        _ => None,
    };

    GrowthSummary {
        latest_period: statements
            .income_statement
            .period_label(0)
            .map(str::to_string),
        revenue: statements.latest(LineItem::TotalRevenue),
        net_income: statements.latest(LineItem::NetIncome),
        revenue_growth_pct,
        profit_growth_pct,
        debt_ratio_pct,
        outlook,
    }
}
