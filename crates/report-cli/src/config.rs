use anyhow::{bail, Context, Result};
use polygon_client::Timeframe;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    // Market data
    pub polygon_api_key: Option<String>,   // None => built-in sample data
    pub polygon_rate_limit: usize,         // requests per minute, 500
    pub timeframe: Timeframe,              // annual

    // Pipeline
    pub fetch_timeout_secs: u64,           // 10
    pub resolver_limit: usize,             // 5
    pub resolver_threshold: u8,            // 50
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            polygon_api_key: None,
            polygon_rate_limit: 500,
            timeframe: Timeframe::Annual,
            fetch_timeout_secs: 10,
            resolver_limit: 5,
            resolver_threshold: 50,
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            polygon_api_key: lookup("POLYGON_API_KEY").filter(|k| !k.trim().is_empty()),
            polygon_rate_limit: parse_or(&lookup, "POLYGON_RATE_LIMIT", defaults.polygon_rate_limit)?,
            timeframe: match lookup("POLYGON_TIMEFRAME") {
                Some(v) => v.parse().with_context(|| format!("POLYGON_TIMEFRAME={}", v))?,
                None => defaults.timeframe,
            },
            fetch_timeout_secs: parse_or(&lookup, "FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?,
            resolver_limit: parse_or(&lookup, "RESOLVER_LIMIT", defaults.resolver_limit)?,
            resolver_threshold: parse_or(&lookup, "RESOLVER_THRESHOLD", defaults.resolver_threshold)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch_timeout_secs == 0 {
            bail!("FETCH_TIMEOUT_SECS must be positive");
        }
        if self.resolver_limit == 0 {
            bail!("RESOLVER_LIMIT must be positive");
        }
        if self.resolver_threshold > 100 {
            bail!("RESOLVER_THRESHOLD must be within 0..=100, got {}", self.resolver_threshold);
        }
        if self.polygon_rate_limit == 0 {
            bail!("POLYGON_RATE_LIMIT must be positive");
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ReportConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = ReportConfig::from_lookup(lookup(&[
            ("POLYGON_API_KEY", "abc123"),
            ("POLYGON_TIMEFRAME", "quarterly"),
            ("FETCH_TIMEOUT_SECS", "3"),
            ("RESOLVER_LIMIT", "10"),
            ("RESOLVER_THRESHOLD", "70"),
        ]))
        .unwrap();

        assert_eq!(config.polygon_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.timeframe, Timeframe::Quarterly);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(config.resolver_limit, 10);
        assert_eq!(config.resolver_threshold, 70);
    }

    #[test]
    fn test_blank_api_key_means_sample_data() {
        let config = ReportConfig::from_lookup(lookup(&[("POLYGON_API_KEY", "  ")])).unwrap();
        assert!(config.polygon_api_key.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ReportConfig::from_lookup(lookup(&[("RESOLVER_THRESHOLD", "fifty")])).is_err());
        assert!(ReportConfig::from_lookup(lookup(&[("RESOLVER_THRESHOLD", "150")])).is_err());
        assert!(ReportConfig::from_lookup(lookup(&[("FETCH_TIMEOUT_SECS", "0")])).is_err());
        assert!(ReportConfig::from_lookup(lookup(&[("POLYGON_TIMEFRAME", "weekly")])).is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(ReportConfig::from_lookup(lookup(&[("RESOLVER_LIMIT", "0")])).is_err());

        // A --limit 0 override is caught by the second validation pass
        let mut config = ReportConfig::from_lookup(lookup(&[])).unwrap();
        config.resolver_limit = 0;
        assert!(config.validate().is_err());
    }
}
