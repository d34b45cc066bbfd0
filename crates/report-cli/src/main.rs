//! report-cli: resolve a company by name and print its financial ratios.
//!
//! Usage:
//!   cargo run -p report-cli -- search "apple"
//!   cargo run -p report-cli -- report AAPL
//!   cargo run -p report-cli -- --json report "苹果"
//!   cargo run -p report-cli -- companies
//!
//! Without POLYGON_API_KEY (or with --sample) reports use built-in sample statements.

mod config;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use company_resolver::{CompanyTable, Resolver};
use polygon_client::PolygonClient;
use ratio_engine::RatioEngine;
use report_core::{ReportError, SampleProvider, StatementProvider};
use report_orchestrator::{ReportService, SearchOutcome};
use std::sync::Arc;

use crate::config::ReportConfig;

#[derive(Debug, Parser)]
#[command(name = "report-cli", about = "Company financial statement digest")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Use built-in sample statements even if an API key is set
    #[arg(long, global = true)]
    sample: bool,

    /// Fetch timeout in seconds (overrides FETCH_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fuzzy-search the company table
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        threshold: Option<u8>,
    },
    /// Build a report for a company display name or ticker
    Report { company: String },
    /// List known companies
    Companies,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "report_cli=info,polygon_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ReportConfig::from_env()?;
    if let Some(timeout) = cli.timeout {
        config.fetch_timeout_secs = timeout;
    }
    if let Command::Search { limit, threshold, .. } = &cli.command {
        if let Some(limit) = limit {
            config.resolver_limit = *limit;
        }
        if let Some(threshold) = threshold {
            config.resolver_threshold = *threshold;
        }
    }
    config.validate()?;

    let table = Arc::new(CompanyTable::builtin()?);
    let resolver = Resolver::new(Arc::clone(&table))
        .with_limit(config.resolver_limit)
        .with_threshold(config.resolver_threshold);

    let provider: Arc<dyn StatementProvider> = match (&config.polygon_api_key, cli.sample) {
        (Some(key), false) => Arc::new(
            PolygonClient::with_rate_limit(key.clone(), config.polygon_rate_limit)
                .with_timeframe(config.timeframe),
        ),
        _ => {
            tracing::info!("Using built-in sample statements");
            Arc::new(SampleProvider::new())
        }
    };
    let engine = RatioEngine::new(provider).with_timeout(config.fetch_timeout());
    let service = ReportService::new(resolver, engine);

    match cli.command {
        Command::Search { query, .. } => {
            let outcome = service.search(&query);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", render::render_search(&query, &outcome));
            }
        }
        Command::Report { company } => match service.report_for(&company).await {
            Ok(report) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", render::render_report(&report));
                }
            }
            Err(ReportError::UnknownCompany(input)) => {
                // Offer candidates instead of guessing a selection
                let outcome = service.search(&input);
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                } else {
                    if matches!(outcome, SearchOutcome::Matches(_)) {
                        println!("\"{}\" is not a known company name or ticker.", input);
                    }
                    print!("{}", render::render_search(&input, &outcome));
                }
                std::process::exit(2);
            }
            Err(e) => return Err(e.into()),
        },
        Command::Companies => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(table.records())?);
            } else {
                print!("{}", render::render_companies(&table));
            }
        }
    }

    Ok(())
}
