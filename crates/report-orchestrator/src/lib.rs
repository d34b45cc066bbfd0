use chrono::{DateTime, Utc};
use company_resolver::{Match, Resolver};
use ratio_engine::{summarize_growth, trend_series, GrowthSummary, RatioEngine, TrendSeries};
use report_core::{Availability, CompanyRecord, LineItem, RatioSet, ReportError, StatementSet};
use serde::{Deserialize, Serialize};

/// Rows charted in the trend section
const TREND_ITEMS: [LineItem; 4] = [
    LineItem::TotalRevenue,
    LineItem::NetIncome,
    LineItem::GrossProfit,
    LineItem::TotalLiabilities,
];

/// Result of a company search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchOutcome {
    Matches(Vec<Match>),
    /// Nothing scored above the threshold; ask for another name
    NoMatchFound,
}

/// Everything the presentation layer shows for one company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyReport {
    pub company: CompanyRecord,
    pub generated_at: DateTime<Utc>,
    pub provider: String,
    pub availability: Availability,
    pub statements: StatementSet,
    pub ratios: RatioSet,
    /// `None` when data is unavailable
    pub growth: Option<GrowthSummary>,
    pub trends: Vec<TrendSeries>,
}

impl CompanyReport {
    pub fn is_data_available(&self) -> bool {
        self.availability.is_available()
    }
}

/// Search-then-report pipeline over a shared company table
pub struct ReportService {
    resolver: Resolver,
    engine: RatioEngine,
}

impl ReportService {
    pub fn new(resolver: Resolver, engine: RatioEngine) -> Self {
        Self { resolver, engine }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        let matches = self.resolver.search(query);
        if matches.is_empty() {
            tracing::info!("No company matches {:?}", query);
            SearchOutcome::NoMatchFound
        } else {
            SearchOutcome::Matches(matches)
        }
    }

    /// Pick a company by exact display name or ticker; no fuzzy guessing
    pub fn select(&self, input: &str) -> Result<CompanyRecord, ReportError> {
        let input = input.trim();
        let table = self.resolver.table();
        table
            .get(input)
            .or_else(|| table.find_by_ticker(input))
            .cloned()
            .ok_or_else(|| ReportError::UnknownCompany(input.to_string()))
    }

    pub async fn report(&self, company: &CompanyRecord) -> CompanyReport {
        tracing::info!(
            "Building report for {} ({}) via {}",
            company.display_name,
            company.ticker,
            self.engine.provider_name()
        );

        let outcome = self.engine.evaluate(&company.ticker).await;
        let (growth, trends) = if outcome.availability.is_available() {
            (
                Some(summarize_growth(&outcome.statements)),
                trend_series(&outcome.statements, &TREND_ITEMS),
            )
        } else {
            (None, Vec::new())
        };

        CompanyReport {
            company: company.clone(),
            generated_at: Utc::now(),
            provider: self.engine.provider_name().to_string(),
            availability: outcome.availability,
            statements: outcome.statements,
            ratios: outcome.ratios,
            growth,
            trends,
        }
    }

    /// Select by name or ticker, then report
    pub async fn report_for(&self, input: &str) -> Result<CompanyReport, ReportError> {
        let company = self.select(input)?;
        Ok(self.report(&company).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use company_resolver::CompanyTable;
    use report_core::{
        RatioKind, SampleProvider, StatementProvider, UnavailableReason,
    };
    use std::sync::Arc;

    struct EmptyProvider;

    #[async_trait]
    impl StatementProvider for EmptyProvider {
        fn name(&self) -> &str {
            "empty"
        }

        async fn fetch_statements(&self, _ticker: &str) -> Result<StatementSet, ReportError> {
            Ok(StatementSet::default())
        }
    }

    fn service(provider: Arc<dyn StatementProvider>) -> ReportService {
        let table = Arc::new(CompanyTable::builtin().unwrap());
        ReportService::new(Resolver::new(table), RatioEngine::new(provider))
    }

    #[test]
    fn test_search_ranks_best_first() {
        let svc = service(Arc::new(SampleProvider::new()));
        match svc.search("microsoft") {
            SearchOutcome::Matches(matches) => {
                assert_eq!(matches[0].record.ticker, "MSFT");
                assert!(matches.len() <= 5);
            }
            SearchOutcome::NoMatchFound => panic!("expected matches"),
        }
    }

    #[test]
    fn test_search_no_match() {
        let svc = service(Arc::new(SampleProvider::new()));
        assert_eq!(svc.search("qqqqqqqqqqqq"), SearchOutcome::NoMatchFound);
        assert_eq!(svc.search(""), SearchOutcome::NoMatchFound);
    }

    #[test]
    fn test_select_by_name_or_ticker() {
        let svc = service(Arc::new(SampleProvider::new()));
        assert_eq!(svc.select("苹果").unwrap().ticker, "AAPL");
        assert_eq!(svc.select(" nvda ").unwrap().display_name, "NVIDIA Corporation");
        assert_eq!(
            svc.select("Appel").unwrap_err(),
            ReportError::UnknownCompany("Appel".to_string())
        );
    }

    #[tokio::test]
    async fn test_report_with_sample_data() {
        let svc = service(Arc::new(SampleProvider::new()));
        let report = svc.report_for("AAPL").await.unwrap();

        assert!(report.is_data_available());
        assert_eq!(report.provider, "sample");
        assert_eq!(report.ratios.len(), RatioKind::ALL.len());
        assert!(report.growth.is_some());
        assert_eq!(report.trends.len(), TREND_ITEMS.len());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["company"]["ticker"], "AAPL");
    }

    #[tokio::test]
    async fn test_report_without_data_suppresses_sections() {
        let svc = service(Arc::new(EmptyProvider));
        let report = svc.report_for("MSFT").await.unwrap();

        assert_eq!(
            report.availability,
            Availability::Unavailable(UnavailableReason::NoRows)
        );
        assert!(report.ratios.is_empty());
        assert!(report.growth.is_none());
        assert!(report.trends.is_empty());
    }
}
