use report_core::{
    Availability, RatioSet, ReportError, StatementProvider, StatementSet, UnavailableReason,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::derive_ratios;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Statements, derived ratios and whether any data was obtained.
///
/// When `availability` is `Unavailable` both `statements` and `ratios` are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioOutcome {
    pub ticker: String,
    pub availability: Availability,
    pub statements: StatementSet,
    pub ratios: RatioSet,
}

impl RatioOutcome {
    fn unavailable(ticker: &str, reason: UnavailableReason) -> Self {
        Self {
            ticker: ticker.to_string(),
            availability: Availability::Unavailable(reason),
            statements: StatementSet::default(),
            ratios: RatioSet::new(),
        }
    }
}

/// Fetches statements through a provider and derives ratios from them
#[derive(Clone)]
pub struct RatioEngine {
    provider: Arc<dyn StatementProvider>,
    timeout: Duration,
}

impl RatioEngine {
    pub fn new(provider: Arc<dyn StatementProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch and derive. Never fails: provider errors, timeouts and empty
    /// responses come back as `Availability::Unavailable`.
    pub async fn evaluate(&self, ticker: &str) -> RatioOutcome {
        let fetched = tokio::time::timeout(self.timeout, self.provider.fetch_statements(ticker)).await;

        let statements = match fetched {
            Ok(Ok(statements)) => statements,
            Ok(Err(e)) => {
                let reason = classify(e);
                match &reason {
                    UnavailableReason::Malformed(msg) => {
                        tracing::error!("Malformed statements for {} from {}: {}", ticker, self.provider.name(), msg)
                    }
                    other => {
                        tracing::warn!("Statements for {} unavailable from {}: {}", ticker, self.provider.name(), other)
                    }
                }
                return RatioOutcome::unavailable(ticker, reason);
            }
            Err(_) => {
                tracing::warn!(
                    "Fetching statements for {} from {} timed out after {:.1}s",
                    ticker,
                    self.provider.name(),
                    self.timeout.as_secs_f64()
                );
                return RatioOutcome::unavailable(ticker, UnavailableReason::TimedOut);
            }
        };

        if statements.is_empty() {
            tracing::warn!("{} returned no statement rows for {}", self.provider.name(), ticker);
            return RatioOutcome::unavailable(ticker, UnavailableReason::NoRows);
        }

        let ratios = derive_ratios(&statements);
        tracing::info!("Derived {}/6 ratios for {}", ratios.len(), ticker);

        RatioOutcome {
            ticker: ticker.to_string(),
            availability: Availability::Available,
            statements,
            ratios,
        }
    }
}

fn classify(error: ReportError) -> UnavailableReason {
    match error {
        ReportError::InvalidData(msg) => UnavailableReason::Malformed(msg),
        other => UnavailableReason::Unreachable(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use report_core::{LineItem, RatioKind, SampleProvider, StatementTable};

    enum Behaviour {
        Fail(ReportError),
        Empty,
        Hang,
        Partial,
    }

    struct StubProvider(Behaviour);

    #[async_trait]
    impl StatementProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch_statements(&self, _ticker: &str) -> Result<StatementSet, ReportError> {
            match &self.0 {
                Behaviour::Fail(e) => Err(e.clone()),
                Behaviour::Empty => Ok(StatementSet::default()),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(StatementSet::default())
                }
                Behaviour::Partial => Ok(StatementSet {
                    income_statement: StatementTable::new()
                        .with_row(LineItem::TotalRevenue, &[200.0])?
                        .with_row(LineItem::NetIncome, &[22.0])?,
                    ..Default::default()
                }),
            }
        }
    }

    fn engine(behaviour: Behaviour) -> RatioEngine {
        RatioEngine::new(Arc::new(StubProvider(behaviour)))
    }

    #[tokio::test]
    async fn test_sample_provider_yields_all_ratios() {
        let outcome = RatioEngine::new(Arc::new(SampleProvider::new())).evaluate("AAPL").await;
        assert!(outcome.availability.is_available());
        assert_eq!(outcome.ratios.len(), 6);
        assert_eq!(outcome.ticker, "AAPL");
    }

    #[tokio::test]
    async fn test_partial_data_is_available_with_some_ratios() {
        let outcome = engine(Behaviour::Partial).evaluate("XYZ").await;
        assert_eq!(outcome.availability, Availability::Available);
        assert_eq!(outcome.ratios.kinds(), vec![RatioKind::NetMargin]);
    }

    #[tokio::test]
    async fn test_empty_response_is_unavailable() {
        let outcome = engine(Behaviour::Empty).evaluate("XYZ").await;
        assert_eq!(outcome.availability, Availability::Unavailable(UnavailableReason::NoRows));
        assert!(outcome.ratios.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_unreachable() {
        let outcome = engine(Behaviour::Fail(ReportError::ApiError("connection refused".into())))
            .evaluate("XYZ")
            .await;
        assert!(matches!(
            outcome.availability,
            Availability::Unavailable(UnavailableReason::Unreachable(_))
        ));
        assert!(outcome.ratios.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_data_is_malformed() {
        let outcome = engine(Behaviour::Fail(ReportError::InvalidData("revenues is a string".into())))
            .evaluate("XYZ")
            .await;
        assert_eq!(
            outcome.availability,
            Availability::Unavailable(UnavailableReason::Malformed("revenues is a string".into()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_unavailable() {
        let outcome = engine(Behaviour::Hang)
            .with_timeout(Duration::from_secs(5))
            .evaluate("XYZ")
            .await;
        assert_eq!(outcome.availability, Availability::Unavailable(UnavailableReason::TimedOut));
        assert!(outcome.statements.is_empty());
    }
}
