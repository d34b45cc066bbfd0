use async_trait::async_trait;
use crate::{ReportError, StatementSet};

/// Source of raw financial statements for a ticker
#[async_trait]
pub trait StatementProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetch balance sheet, income statement and cash flow, most recent period first.
    /// An empty `StatementSet` means the source had nothing for the ticker.
    async fn fetch_statements(&self, ticker: &str) -> Result<StatementSet, ReportError>;
}

/// Approximate string similarity used to rank company names.
///
/// Inputs arrive already lowercased and whitespace-normalised.
pub trait StringSimilarity: Send + Sync {
    /// Score in 0..=100, 100 meaning identical
    fn score(&self, query: &str, candidate: &str) -> u8;
}
