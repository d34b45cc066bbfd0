//! Plain-text rendering of search results and reports.

use company_resolver::{CompanyTable, Match};
use report_core::{Availability, RatioKind, StatementKind, StatementTable};
use report_orchestrator::{CompanyReport, SearchOutcome};
use std::fmt::Write;

pub fn render_search(query: &str, outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Matches(matches) => {
            let mut out = format!("Matches for \"{}\":\n", query);
            out.push_str(&render_matches(matches));
            out
        }
        SearchOutcome::NoMatchFound => {
            format!("No company matches \"{}\". Try another name or a ticker.\n", query)
        }
    }
}

fn render_matches(matches: &[Match]) -> String {
    let mut out = String::new();
    for (i, m) in matches.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<36} {:<10} score {}",
            i + 1,
            m.record.display_name,
            m.record.ticker,
            m.score
        );
    }
    out
}

pub fn render_companies(table: &CompanyTable) -> String {
    let mut out = String::new();
    for record in table.iter() {
        let _ = writeln!(out, "{:<36} {}", record.display_name, record.ticker);
    }
    out
}

fn format_ratio(kind: RatioKind, value: f64) -> String {
    if kind.is_percentage() {
        format!("{:.2}%", value)
    } else {
        format!("{:.2}", value)
    }
}

fn render_table(out: &mut String, kind: StatementKind, table: &StatementTable) {
    if table.is_empty() {
        return;
    }
    let periods = table.period_count();
    let _ = writeln!(out, "\n{}", kind.to_label());

    let mut header = format!("  {:<40}", "");
    for period in 0..periods {
        let label = table
            .period_label(period)
            .map(str::to_string)
            .unwrap_or_else(|| format!("P{}", period));
        let _ = write!(header, "{:>16}", label);
    }
    let _ = writeln!(out, "{}", header.trim_end());

    for name in table.row_names() {
        let mut line = format!("  {:<40}", name);
        for period in 0..periods {
            match table.value(name, period) {
                Some(v) => {
                    let _ = write!(line, "{:>16.2}", v);
                }
                None => {
                    let _ = write!(line, "{:>16}", "-");
                }
            }
        }
        let _ = writeln!(out, "{}", line);
    }
}

pub fn render_report(report: &CompanyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) financial report",
        report.company.display_name, report.company.ticker
    );
    let _ = writeln!(
        out,
        "Source: {}, generated {}",
        report.provider,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    if let Availability::Unavailable(reason) = &report.availability {
        let _ = writeln!(out, "\nWARNING: financial data unavailable ({})", reason);
        return out;
    }

    for kind in [StatementKind::IncomeStatement, StatementKind::BalanceSheet, StatementKind::CashFlow] {
        render_table(&mut out, kind, report.statements.table(kind));
    }

    let _ = writeln!(out, "\nKey ratios");
    if report.ratios.is_empty() {
        let _ = writeln!(out, "  (none applicable)");
    }
    for (kind, value) in report.ratios.iter() {
        let _ = writeln!(out, "  {:<24} {:>12}", kind.to_label(), format_ratio(kind, value));
    }

    if let Some(growth) = &report.growth {
        let _ = writeln!(out, "\nHighlights{}", growth
            .latest_period
            .as_deref()
            .map(|p| format!(" ({})", p))
            .unwrap_or_default());
        if let Some(revenue) = growth.revenue {
            let _ = write!(out, "  Revenue: {:.2}", revenue);
            if let Some(g) = growth.revenue_growth_pct {
                let _ = write!(out, ", {:+.2}% year over year", g);
            }
            out.push('\n');
        }
        if let Some(net_income) = growth.net_income {
            let _ = write!(out, "  Net income: {:.2}", net_income);
            if let Some(g) = growth.profit_growth_pct {
                let _ = write!(out, ", {:+.2}% year over year", g);
            }
            out.push('\n');
        }
        if let Some(debt_ratio) = growth.debt_ratio_pct {
            let _ = writeln!(out, "  Liabilities to assets: {:.2}%", debt_ratio);
        }
        if let Some(outlook) = growth.outlook {
            let _ = writeln!(out, "\n{}", outlook.to_label());
        }
    }

    out
}
