//! Chronological series for charting.

use report_core::{LineItem, StatementSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: usize,
    pub label: Option<String>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub item: LineItem,
    /// Oldest first
    pub points: Vec<TrendPoint>,
}

/// Series for every requested item that has at least one value. Gaps are skipped.
pub fn trend_series(statements: &StatementSet, items: &[LineItem]) -> Vec<TrendSeries> {
    items
        .iter()
        .filter_map(|item| {
            let table = statements.table(item.statement());
            let mut points: Vec<TrendPoint> = table
                .row(item.as_str())
                .into_iter()
                .map(|(period, value)| TrendPoint {
                    period,
                    label: table.period_label(period).map(str::to_string),
                    value,
                })
                .collect();
            if points.is_empty() {
                return None;
            }
            points.sort_by(|a, b| b.period.cmp(&a.period));
            Some(TrendSeries { item: *item, points })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_core::SampleProvider;

    #[test]
    fn test_series_oldest_first() {
        let statements = SampleProvider::statements().unwrap();
        let series = trend_series(&statements, &[LineItem::TotalRevenue, LineItem::NetIncome]);

        assert_eq!(series.len(), 2);
        let revenue: Vec<f64> = series[0].points.iter().map(|p| p.value).collect();
        assert_eq!(revenue, vec![120.0, 150.0, 180.0, 200.0]);
        assert_eq!(series[0].points[0].label.as_deref(), Some("FY 2020"));
        assert_eq!(series[1].item, LineItem::NetIncome);
    }

    #[test]
    fn test_missing_items_skipped() {
        let mut statements = StatementSet::default();
        statements.income_statement.insert("TotalRevenue", 0, 200.0).unwrap();
        statements.income_statement.insert("TotalRevenue", 2, 150.0).unwrap();

        let series = trend_series(&statements, &[LineItem::GrossProfit, LineItem::TotalRevenue]);
        assert_eq!(series.len(), 1);
        let periods: Vec<usize> = series[0].points.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![2, 0]);
        assert!(series[0].points[0].label.is_none());
    }
}
