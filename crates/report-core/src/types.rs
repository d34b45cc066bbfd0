use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ReportError;

/// A known company: display name plus the ticker it trades under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub display_name: String,
    pub ticker: String,
}

impl CompanyRecord {
    pub fn new(display_name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ticker: ticker.into(),
        }
    }
}

/// The three financial statements a provider returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl StatementKind {
    pub fn to_label(&self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "Balance Sheet",
            StatementKind::IncomeStatement => "Income Statement",
            StatementKind::CashFlow => "Cash Flow",
        }
    }
}

/// Canonical line items understood by the ratio engine.
///
/// Tables are keyed by plain strings so providers may carry extra rows;
/// these are the names the core reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineItem {
    TotalRevenue,
    GrossProfit,
    NetIncome,
    TotalCurrentAssets,
    TotalCurrentLiabilities,
    TotalAssets,
    TotalLiabilities,
    TotalDebt,
    TotalStockholderEquity,
    OperatingCashFlow,
    NetCashFlow,
}

impl LineItem {
    pub const ALL: [LineItem; 11] = [
        LineItem::TotalRevenue,
        LineItem::GrossProfit,
        LineItem::NetIncome,
        LineItem::TotalCurrentAssets,
        LineItem::TotalCurrentLiabilities,
        LineItem::TotalAssets,
        LineItem::TotalLiabilities,
        LineItem::TotalDebt,
        LineItem::TotalStockholderEquity,
        LineItem::OperatingCashFlow,
        LineItem::NetCashFlow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LineItem::TotalRevenue => "TotalRevenue",
            LineItem::GrossProfit => "GrossProfit",
            LineItem::NetIncome => "NetIncome",
            LineItem::TotalCurrentAssets => "TotalCurrentAssets",
            LineItem::TotalCurrentLiabilities => "TotalCurrentLiabilities",
            LineItem::TotalAssets => "TotalAssets",
            LineItem::TotalLiabilities => "TotalLiabilities",
            LineItem::TotalDebt => "TotalDebt",
            LineItem::TotalStockholderEquity => "TotalStockholderEquity",
            LineItem::OperatingCashFlow => "OperatingCashFlow",
            LineItem::NetCashFlow => "NetCashFlow",
        }
    }

    /// Statement the item is reported on
    pub fn statement(&self) -> StatementKind {
        match self {
            LineItem::TotalRevenue | LineItem::GrossProfit | LineItem::NetIncome => {
                StatementKind::IncomeStatement
            }
            LineItem::OperatingCashFlow | LineItem::NetCashFlow => StatementKind::CashFlow,
            _ => StatementKind::BalanceSheet,
        }
    }
}

impl std::fmt::Display for LineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sparse (line item, period) -> value table. Period 0 is the most recent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    rows: BTreeMap<String, BTreeMap<usize, f64>>,
    #[serde(default)]
    period_labels: Vec<String>,
}

impl StatementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach human-readable labels, most recent first (e.g. "FY 2023")
    pub fn with_period_labels(mut self, labels: Vec<String>) -> Self {
        self.period_labels = labels;
        self
    }

    /// Insert a cell. Non-finite values are data defects and are rejected
    /// rather than stored as absent.
    pub fn insert(&mut self, item: &str, period: usize, value: f64) -> Result<(), ReportError> {
        if !value.is_finite() {
            return Err(ReportError::InvalidData(format!(
                "{} at period {} is not a finite number ({})",
                item, period, value
            )));
        }
        self.rows
            .entry(item.to_string())
            .or_default()
            .insert(period, value);
        Ok(())
    }

    /// Builder-style insert for a full row, most recent period first
    pub fn with_row(mut self, item: LineItem, values: &[f64]) -> Result<Self, ReportError> {
        for (period, value) in values.iter().enumerate() {
            self.insert(item.as_str(), period, *value)?;
        }
        Ok(self)
    }

    pub fn value(&self, item: &str, period: usize) -> Option<f64> {
        self.rows.get(item).and_then(|row| row.get(&period)).copied()
    }

    pub fn get(&self, item: LineItem, period: usize) -> Option<f64> {
        self.value(item.as_str(), period)
    }

    /// Value at the most recent period
    pub fn latest(&self, item: LineItem) -> Option<f64> {
        self.get(item, 0)
    }

    pub fn remove_row(&mut self, item: &str) -> bool {
        self.rows.remove(item).is_some()
    }

    pub fn contains_row(&self, item: &str) -> bool {
        self.rows.get(item).is_some_and(|row| !row.is_empty())
    }

    pub fn row_names(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(|k| k.as_str())
    }

    /// Present cells of one row as (period, value), most recent first
    pub fn row(&self, item: &str) -> Vec<(usize, f64)> {
        self.rows
            .get(item)
            .map(|row| row.iter().map(|(p, v)| (*p, *v)).collect())
            .unwrap_or_default()
    }

    /// Number of periods spanned (highest index + 1, or label count if larger)
    pub fn period_count(&self) -> usize {
        let from_cells = self
            .rows
            .values()
            .filter_map(|row| row.keys().next_back())
            .max()
            .map(|p| p + 1)
            .unwrap_or(0);
        from_cells.max(self.period_labels.len())
    }

    pub fn period_label(&self, period: usize) -> Option<&str> {
        self.period_labels.get(period).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.values().all(|row| row.is_empty())
    }
}

/// Balance sheet, income statement and cash flow for one ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementSet {
    pub balance_sheet: StatementTable,
    pub income_statement: StatementTable,
    pub cash_flow: StatementTable,
}

impl StatementSet {
    pub fn table(&self, kind: StatementKind) -> &StatementTable {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::IncomeStatement => &self.income_statement,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }

    pub fn table_mut(&mut self, kind: StatementKind) -> &mut StatementTable {
        match kind {
            StatementKind::BalanceSheet => &mut self.balance_sheet,
            StatementKind::IncomeStatement => &mut self.income_statement,
            StatementKind::CashFlow => &mut self.cash_flow,
        }
    }

    /// Look up a canonical item on the statement it belongs to
    pub fn get(&self, item: LineItem, period: usize) -> Option<f64> {
        self.table(item.statement()).get(item, period)
    }

    pub fn latest(&self, item: LineItem) -> Option<f64> {
        self.get(item, 0)
    }

    /// True when the provider returned no rows at all
    pub fn is_empty(&self) -> bool {
        self.balance_sheet.is_empty() && self.income_statement.is_empty() && self.cash_flow.is_empty()
    }
}

/// The fixed set of derived ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatioKind {
    GrossMargin,
    NetMargin,
    CurrentRatio,
    DebtToEquity,
    AssetTurnover,
    ReturnOnEquity,
}

impl RatioKind {
    pub const ALL: [RatioKind; 6] = [
        RatioKind::GrossMargin,
        RatioKind::NetMargin,
        RatioKind::CurrentRatio,
        RatioKind::DebtToEquity,
        RatioKind::AssetTurnover,
        RatioKind::ReturnOnEquity,
    ];

    pub fn to_label(&self) -> &'static str {
        match self {
            RatioKind::GrossMargin => "Gross margin %",
            RatioKind::NetMargin => "Net margin %",
            RatioKind::CurrentRatio => "Current ratio",
            RatioKind::DebtToEquity => "Debt-to-equity",
            RatioKind::AssetTurnover => "Asset turnover",
            RatioKind::ReturnOnEquity => "Return on equity %",
        }
    }

    /// Rows that must be present at period 0, numerator first
    pub fn required_rows(&self) -> [LineItem; 2] {
        match self {
            RatioKind::GrossMargin => [LineItem::GrossProfit, LineItem::TotalRevenue],
            RatioKind::NetMargin => [LineItem::NetIncome, LineItem::TotalRevenue],
            RatioKind::CurrentRatio => [LineItem::TotalCurrentAssets, LineItem::TotalCurrentLiabilities],
            RatioKind::DebtToEquity => [LineItem::TotalDebt, LineItem::TotalStockholderEquity],
            RatioKind::AssetTurnover => [LineItem::TotalRevenue, LineItem::TotalAssets],
            RatioKind::ReturnOnEquity => [LineItem::NetIncome, LineItem::TotalStockholderEquity],
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            RatioKind::GrossMargin | RatioKind::NetMargin | RatioKind::ReturnOnEquity
        )
    }
}

impl std::fmt::Display for RatioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_label())
    }
}

/// Derived ratios. A ratio whose inputs are missing is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    values: BTreeMap<RatioKind, f64>,
}

impl RatioSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: RatioKind, value: f64) {
        self.values.insert(kind, value);
    }

    pub fn get(&self, kind: RatioKind) -> Option<f64> {
        self.values.get(&kind).copied()
    }

    /// Lookup by display label, e.g. "Net margin %"
    pub fn get_by_label(&self, label: &str) -> Option<f64> {
        RatioKind::ALL
            .iter()
            .find(|k| k.to_label() == label)
            .and_then(|k| self.get(*k))
    }

    pub fn contains(&self, kind: RatioKind) -> bool {
        self.values.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RatioKind, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    pub fn kinds(&self) -> Vec<RatioKind> {
        self.values.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Why statement data could not be used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnavailableReason {
    Unreachable(String),
    TimedOut,
    NoRows,
    Malformed(String),
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::Unreachable(msg) => write!(f, "data source unreachable: {}", msg),
            UnavailableReason::TimedOut => write!(f, "data source timed out"),
            UnavailableReason::NoRows => write!(f, "no statement rows returned"),
            UnavailableReason::Malformed(msg) => write!(f, "malformed statement data: {}", msg),
        }
    }
}

/// Whether statement data was obtained at all
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Availability {
    Available,
    Unavailable(UnavailableReason),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_non_finite() {
        let mut table = StatementTable::new();
        assert!(table.insert("TotalRevenue", 0, f64::NAN).is_err());
        assert!(table.insert("TotalRevenue", 0, f64::INFINITY).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_sparse_lookup() {
        let mut table = StatementTable::new();
        table.insert("TotalRevenue", 0, 200.0).unwrap();
        table.insert("TotalRevenue", 2, 150.0).unwrap();

        assert_eq!(table.latest(LineItem::TotalRevenue), Some(200.0));
        assert_eq!(table.get(LineItem::TotalRevenue, 1), None);
        assert_eq!(table.get(LineItem::TotalRevenue, 2), Some(150.0));
        assert_eq!(table.latest(LineItem::NetIncome), None);
        assert_eq!(table.period_count(), 3);
    }

    #[test]
    fn test_statement_set_routes_to_owning_table() {
        let mut set = StatementSet::default();
        set.income_statement.insert("NetIncome", 0, 22.0).unwrap();
        // Same name on the wrong statement is not picked up
        set.balance_sheet.insert("TotalRevenue", 0, 999.0).unwrap();

        assert_eq!(set.latest(LineItem::NetIncome), Some(22.0));
        assert_eq!(set.latest(LineItem::TotalRevenue), None);
        assert!(!set.is_empty());
        assert!(StatementSet::default().is_empty());
    }

    #[test]
    fn test_ratio_set_serializes_by_kind() {
        let mut ratios = RatioSet::new();
        ratios.insert(RatioKind::NetMargin, 11.0);
        let json = serde_json::to_value(&ratios).unwrap();
        assert_eq!(json["values"]["NetMargin"], 11.0);
        assert_eq!(ratios.get_by_label("Net margin %"), Some(11.0));
        assert_eq!(ratios.get_by_label("Current ratio"), None);
    }
}
