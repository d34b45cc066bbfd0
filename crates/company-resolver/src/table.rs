//! Static company table.
//!
//! Built once at start-up and shared read-only. Extending the built-in list
//! is a code change.

use report_core::{CompanyRecord, ReportError};
use std::collections::HashSet;

/// Display name -> ticker pairs shipped with the binary
const BUILTIN_COMPANIES: &[(&str, &str)] = &[
    // US large caps
    ("Apple Inc.", "AAPL"),
    ("Microsoft Corporation", "MSFT"),
    ("Alphabet Inc.", "GOOGL"),
    ("Amazon.com Inc.", "AMZN"),
    ("NVIDIA Corporation", "NVDA"),
    ("Meta Platforms Inc.", "META"),
    ("Tesla Inc.", "TSLA"),
    ("Berkshire Hathaway Inc.", "BRK.B"),
    ("JPMorgan Chase & Co.", "JPM"),
    ("Johnson & Johnson", "JNJ"),
    ("Visa Inc.", "V"),
    ("Walmart Inc.", "WMT"),
    ("Procter & Gamble Co.", "PG"),
    ("The Coca-Cola Company", "KO"),
    ("Netflix Inc.", "NFLX"),
    ("Intel Corporation", "INTC"),
    // ADRs and overseas listings
    ("Taiwan Semiconductor Manufacturing", "TSM"),
    ("Alibaba Group Holding", "BABA"),
    // Chinese display names
    ("苹果", "AAPL"),
    ("微软", "MSFT"),
    ("谷歌", "GOOGL"),
    ("亚马逊", "AMZN"),
    ("英伟达", "NVDA"),
    ("特斯拉", "TSLA"),
    ("阿里巴巴", "BABA"),
    ("京东", "JD"),
    ("百度", "BIDU"),
    ("腾讯控股", "0700.HK"),
    ("比亚迪", "1211.HK"),
    ("贵州茅台", "600519.SS"),
];

/// Immutable set of known companies, in table order
#[derive(Debug, Clone)]
pub struct CompanyTable {
    records: Vec<CompanyRecord>,
}

impl CompanyTable {
    /// Build a table, rejecting duplicate display names and blank entries
    pub fn new(records: Vec<CompanyRecord>) -> Result<Self, ReportError> {
        let mut seen = HashSet::new();
        for record in &records {
            if record.display_name.trim().is_empty() || record.ticker.trim().is_empty() {
                return Err(ReportError::InvalidData(format!(
                    "blank company entry: {:?}",
                    record
                )));
            }
            if !seen.insert(record.display_name.as_str()) {
                return Err(ReportError::DuplicateCompany(record.display_name.clone()));
            }
        }
        Ok(Self { records })
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self, ReportError> {
        Self::new(
            pairs
                .iter()
                .map(|(name, ticker)| CompanyRecord::new(*name, *ticker))
                .collect(),
        )
    }

    /// The built-in table
    pub fn builtin() -> Result<Self, ReportError> {
        Self::from_pairs(BUILTIN_COMPANIES)
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompanyRecord> {
        self.records.iter()
    }

    /// Exact display-name lookup
    pub fn get(&self, display_name: &str) -> Option<&CompanyRecord> {
        self.records.iter().find(|r| r.display_name == display_name)
    }

    /// First record trading under `ticker`, case-insensitive
    pub fn find_by_ticker(&self, ticker: &str) -> Option<&CompanyRecord> {
        let ticker = ticker.trim();
        self.records
            .iter()
            .find(|r| r.ticker.eq_ignore_ascii_case(ticker))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_valid() {
        let table = CompanyTable::builtin().unwrap();
        assert_eq!(table.len(), BUILTIN_COMPANIES.len());
        assert_eq!(table.get("苹果").map(|r| r.ticker.as_str()), Some("AAPL"));
    }

    #[test]
    fn test_duplicate_display_name_rejected() {
        let result = CompanyTable::from_pairs(&[("Apple Inc.", "AAPL"), ("Apple Inc.", "AAPL.MX")]);
        assert_eq!(result.unwrap_err(), ReportError::DuplicateCompany("Apple Inc.".to_string()));
    }

    #[test]
    fn test_shared_ticker_allowed() {
        let table = CompanyTable::from_pairs(&[("Apple Inc.", "AAPL"), ("苹果", "AAPL")]).unwrap();
        assert_eq!(table.len(), 2);
        // First entry wins for ticker lookup
        assert_eq!(table.find_by_ticker("aapl").unwrap().display_name, "Apple Inc.");
        assert!(table.find_by_ticker("MSFT").is_none());
    }

    #[test]
    fn test_blank_entry_rejected() {
        assert!(CompanyTable::from_pairs(&[("  ", "AAPL")]).is_err());
        assert!(CompanyTable::from_pairs(&[("Apple Inc.", "")]).is_err());
    }
}
