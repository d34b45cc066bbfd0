//! Built-in sample statements.
//!
//! Four fiscal years of fabricated figures (in hundreds of millions), used when
//! no market-data API key is configured so the pipeline still produces a report.

use async_trait::async_trait;

use crate::{LineItem, ReportError, StatementProvider, StatementSet, StatementTable};

/// Fiscal years covered, most recent first
const YEARS: [i32; 4] = [2023, 2022, 2021, 2020];

const REVENUE: [f64; 4] = [200.0, 180.0, 150.0, 120.0];
const NET_INCOME: [f64; 4] = [22.0, 18.0, 15.0, 10.0];
/// Gross margin of 38/35/32/30 %
const GROSS_PROFIT: [f64; 4] = [76.0, 63.0, 48.0, 36.0];

const TOTAL_ASSETS: [f64; 4] = [500.0, 460.0, 400.0, 340.0];
/// Liabilities-to-assets of 47/50/48/45 %
const TOTAL_LIABILITIES: [f64; 4] = [235.0, 230.0, 192.0, 153.0];
const EQUITY: [f64; 4] = [265.0, 230.0, 208.0, 187.0];
const CURRENT_ASSETS: [f64; 4] = [180.0, 165.0, 140.0, 120.0];
const CURRENT_LIABILITIES: [f64; 4] = [110.0, 105.0, 95.0, 85.0];
const TOTAL_DEBT: [f64; 4] = [90.0, 95.0, 88.0, 80.0];

const OPERATING_CASH_FLOW: [f64; 4] = [30.0, 26.0, 21.0, 15.0];
const NET_CASH_FLOW: [f64; 4] = [8.0, 5.0, 4.0, 2.0];

/// Provider that returns the same fabricated statements for every ticker
#[derive(Debug, Clone, Default)]
pub struct SampleProvider;

impl SampleProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn statements() -> Result<StatementSet, ReportError> {
        let labels: Vec<String> = YEARS.iter().map(|y| format!("FY {}", y)).collect();

        let income_statement = StatementTable::new()
            .with_period_labels(labels.clone())
            .with_row(LineItem::TotalRevenue, &REVENUE)?
            .with_row(LineItem::GrossProfit, &GROSS_PROFIT)?
            .with_row(LineItem::NetIncome, &NET_INCOME)?;

        let balance_sheet = StatementTable::new()
            .with_period_labels(labels.clone())
            .with_row(LineItem::TotalAssets, &TOTAL_ASSETS)?
            .with_row(LineItem::TotalLiabilities, &TOTAL_LIABILITIES)?
            .with_row(LineItem::TotalStockholderEquity, &EQUITY)?
            .with_row(LineItem::TotalCurrentAssets, &CURRENT_ASSETS)?
            .with_row(LineItem::TotalCurrentLiabilities, &CURRENT_LIABILITIES)?
            .with_row(LineItem::TotalDebt, &TOTAL_DEBT)?;

        let cash_flow = StatementTable::new()
            .with_period_labels(labels)
            .with_row(LineItem::OperatingCashFlow, &OPERATING_CASH_FLOW)?
            .with_row(LineItem::NetCashFlow, &NET_CASH_FLOW)?;

        Ok(StatementSet {
            balance_sheet,
            income_statement,
            cash_flow,
        })
    }
}

#[async_trait]
impl StatementProvider for SampleProvider {
    fn name(&self) -> &str {
        "sample"
    }

    async fn fetch_statements(&self, ticker: &str) -> Result<StatementSet, ReportError> {
        tracing::debug!("Serving sample statements for {}", ticker);
        Self::statements()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_statements_are_complete() {
        let set = SampleProvider::new().fetch_statements("AAPL").await.unwrap();

        for item in LineItem::ALL {
            assert!(set.latest(item).is_some(), "missing {}", item);
        }
        assert_eq!(set.income_statement.period_count(), 4);
        assert_eq!(set.income_statement.period_label(0), Some("FY 2023"));
        assert_eq!(set.latest(LineItem::TotalRevenue), Some(200.0));
    }

    #[test]
    fn test_sample_balance_sheet_identity() {
        let set = SampleProvider::statements().unwrap();
        for period in 0..4 {
            let assets = set.get(LineItem::TotalAssets, period).unwrap();
            let liabilities = set.get(LineItem::TotalLiabilities, period).unwrap();
            let equity = set.get(LineItem::TotalStockholderEquity, period).unwrap();
            assert!((assets - liabilities - equity).abs() < 1e-9);
        }
    }
}
