use async_trait::async_trait;
use report_core::{
    LineItem, ReportError, StatementKind, StatementProvider, StatementSet, StatementTable,
};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const BASE_URL: &str = "https://api.polygon.io";
const DEFAULT_RATE_LIMIT: usize = 500;
const MAX_RETRIES: u32 = 3;
const RETRY_WAIT_SECS: u64 = 15;
/// Periods requested per ticker
const FILINGS_LIMIT: u32 = 8;

/// Polygon field key -> canonical line item
const FIELD_MAP: &[(StatementKind, &str, LineItem)] = &[
    (StatementKind::IncomeStatement, "revenues", LineItem::TotalRevenue),
    (StatementKind::IncomeStatement, "gross_profit", LineItem::GrossProfit),
    (StatementKind::IncomeStatement, "net_income_loss", LineItem::NetIncome),
    (StatementKind::BalanceSheet, "current_assets", LineItem::TotalCurrentAssets),
    (StatementKind::BalanceSheet, "current_liabilities", LineItem::TotalCurrentLiabilities),
    (StatementKind::BalanceSheet, "assets", LineItem::TotalAssets),
    (StatementKind::BalanceSheet, "liabilities", LineItem::TotalLiabilities),
    (StatementKind::BalanceSheet, "long_term_debt", LineItem::TotalDebt),
    (StatementKind::BalanceSheet, "equity", LineItem::TotalStockholderEquity),
    (StatementKind::CashFlow, "net_cash_flow_from_operating_activities", LineItem::OperatingCashFlow),
    (StatementKind::CashFlow, "net_cash_flow", LineItem::NetCashFlow),
];

fn canonical_name(kind: StatementKind, key: &str) -> Option<&'static str> {
    FIELD_MAP
        .iter()
        .find(|(k, field, _)| *k == kind && *field == key)
        .map(|(_, _, item)| item.as_str())
}

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Remove timestamps outside the window
            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }
            let oldest = ts.front().copied().unwrap_or(now);

            // Wait until the oldest request falls out of the window
            let sleep_dur = (oldest + self.window).duration_since(now) + Duration::from_millis(50);
            drop(ts);
            tracing::debug!("Rate limiter: waiting {:.1}s for Polygon API slot", sleep_dur.as_secs_f64());
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// Reporting granularity for statement requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    Quarterly,
    #[default]
    Annual,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Quarterly => "quarterly",
            Timeframe::Annual => "annual",
        }
    }
}

impl FromStr for Timeframe {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quarterly" => Ok(Timeframe::Quarterly),
            "annual" => Ok(Timeframe::Annual),
            other => Err(ReportError::Config(format!("unknown timeframe: {}", other))),
        }
    }
}

#[derive(Clone)]
pub struct PolygonClient {
    api_key: String,
    client: Client,
    rate_limiter: RateLimiter,
    timeframe: Timeframe,
    base_url: String,
    retry_wait: Duration,
}

impl PolygonClient {
    pub fn new(api_key: String) -> Self {
        Self::with_rate_limit(api_key, DEFAULT_RATE_LIMIT)
    }

    pub fn with_rate_limit(api_key: String, requests_per_minute: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            client,
            rate_limiter: RateLimiter::new(requests_per_minute, Duration::from_secs(60)),
            timeframe: Timeframe::default(),
            base_url: BASE_URL.to_string(),
            retry_wait: Duration::from_secs(RETRY_WAIT_SECS),
        }
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    /// Point the client at another host, e.g. a proxy or a local stub
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Pause between attempts after a 429
    pub fn with_retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait = wait;
        self
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ReportError> {
        let request = builder.build().map_err(|e| ReportError::ApiError(e.to_string()))?;

        for attempt in 0..MAX_RETRIES {
            self.rate_limiter.acquire().await;
            let req_clone = request.try_clone()
                .ok_or_else(|| ReportError::ApiError("Cannot clone request".to_string()))?;
            let response = self.client.execute(req_clone).await
                .map_err(|e| ReportError::ApiError(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            tracing::warn!(
                "Polygon 429 rate limited, waiting {:.1}s before retry {}/{}",
                self.retry_wait.as_secs_f64(),
                attempt + 1,
                MAX_RETRIES
            );
            tokio::time::sleep(self.retry_wait).await;
        }

        Err(ReportError::ApiError(format!(
            "Rate limited by Polygon after {} retries",
            MAX_RETRIES
        )))
    }

    /// Get balance sheet, income statement and cash flow, most recent filing first
    pub async fn get_statements(&self, symbol: &str) -> Result<StatementSet, ReportError> {
        let url = format!("{}/vX/reference/financials", self.base_url);
        let limit = FILINGS_LIMIT.to_string();

        let response = self.send_request(
            self.client.get(&url).query(&[
                ("ticker", symbol),
                ("timeframe", self.timeframe.as_str()),
                ("order", "desc"),
                ("sort", "period_of_report_date"),
                ("limit", limit.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
        ).await?;

        if !response.status().is_success() {
            if response.status().as_u16() == 403 || response.status().as_u16() == 401 {
                tracing::warn!("Polygon financials not available on this plan for {}", symbol);
                return Ok(StatementSet::default());
            }
            return Err(ReportError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let fin_response: FinancialsResponse = response
            .json()
            .await
            .map_err(|e| ReportError::ApiError(e.to_string()))?;

        tracing::debug!("Polygon returned {} filing(s) for {}", fin_response.results.len(), symbol);
        statements_from_results(fin_response.results)
    }
}

#[async_trait]
impl StatementProvider for PolygonClient {
    fn name(&self) -> &str {
        "polygon"
    }

    async fn fetch_statements(&self, ticker: &str) -> Result<StatementSet, ReportError> {
        self.get_statements(ticker).await
    }
}

/// Parse a raw `/vX/reference/financials` body
pub fn parse_financials(body: &str) -> Result<StatementSet, ReportError> {
    let response: FinancialsResponse =
        serde_json::from_str(body).map_err(|e| ReportError::InvalidData(e.to_string()))?;
    statements_from_results(response.results)
}

/// Each result is one filing; its index is the period index.
///
/// Fields without a `value` are absent. A `value` that is present but not a
/// number is a data defect and fails the whole conversion.
fn statements_from_results(results: Vec<FinancialResult>) -> Result<StatementSet, ReportError> {
    let labels: Vec<String> = results
        .iter()
        .map(|r| format!("{} {}", r.fiscal_period, r.fiscal_year).trim().to_string())
        .collect();

    let labelled = || StatementTable::new().with_period_labels(labels.clone());
    let mut set = StatementSet {
        balance_sheet: labelled(),
        income_statement: labelled(),
        cash_flow: labelled(),
    };

    for (period, result) in results.into_iter().enumerate() {
        let sections = [
            (StatementKind::BalanceSheet, result.financials.balance_sheet),
            (StatementKind::IncomeStatement, result.financials.income_statement),
            (StatementKind::CashFlow, result.financials.cash_flow_statement),
        ];

        for (kind, fields) in sections {
            for (key, field) in fields {
                let value = match field.value {
                    None | Some(serde_json::Value::Null) => continue,
                    Some(serde_json::Value::Number(n)) => n.as_f64().ok_or_else(|| {
                        ReportError::InvalidData(format!("{}: {} is not representable", key, n))
                    })?,
                    Some(other) => {
                        return Err(ReportError::InvalidData(format!(
                            "{}.{} at period {} is not numeric: {}",
                            kind.to_label(),
                            key,
                            period,
                            other
                        )))
                    }
                };
                let name = canonical_name(kind, &key).unwrap_or(key.as_str());
                set.table_mut(kind).insert(name, period, value)?;
            }
        }
    }

    Ok(set)
}

#[derive(Debug, Deserialize)]
struct FinancialsResponse {
    #[serde(default)]
    results: Vec<FinancialResult>,
}

#[derive(Debug, Deserialize)]
struct FinancialResult {
    #[serde(default)]
    fiscal_period: String,
    #[serde(default)]
    fiscal_year: String,
    #[serde(default)]
    financials: FinancialStatements,
}

#[derive(Debug, Default, Deserialize)]
struct FinancialStatements {
    #[serde(default)]
    income_statement: HashMap<String, FinancialField>,
    #[serde(default)]
    balance_sheet: HashMap<String, FinancialField>,
    #[serde(default)]
    cash_flow_statement: HashMap<String, FinancialField>,
}

#[derive(Debug, Deserialize)]
struct FinancialField {
    #[serde(default)]
    value: Option<serde_json::Value>,
}
