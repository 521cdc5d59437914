//! Report command: full pipeline from gross amount to per-candidate payouts.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use pd_core::{PayoutReport, run_report};

use crate::Config;
use crate::commands::util::{format_amount, format_percent, load_candidates, share_bar};

/// JSON payload for `pd report --json`.
#[derive(Debug, Serialize)]
struct ReportJson<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a PayoutReport,
}

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    gross: f64,
    candidates_path: &Path,
    json: bool,
) -> Result<()> {
    let candidates = load_candidates(candidates_path)?;
    let policy = config.policy()?;

    let report = run_report(gross, &candidates, &policy).context("payout run rejected")?;
    tracing::debug!(
        pool = report.pool_amount,
        total = report.distribution.total_distributed,
        "report computed"
    );

    render(writer, &report, json)
}

fn render<W: Write>(writer: &mut W, report: &PayoutReport, json: bool) -> Result<()> {
    if json {
        let payload = ReportJson {
            generated_at: Utc::now(),
            report,
        };
        serde_json::to_writer_pretty(&mut *writer, &payload)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "Payout report for gross {}", format_amount(report.gross))?;
    writeln!(writer)?;
    writeln!(writer, "Base split")?;
    for bucket in &report.buckets {
        writeln!(
            writer,
            "  {:<12} {:>6}  {:>12}",
            bucket.name.as_str(),
            format_percent(bucket.fraction),
            format_amount(bucket.amount)
        )?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "Pool bucket: {} ({})",
        report.pool_bucket.as_str(),
        format_amount(report.pool_amount)
    )?;

    if report.distribution.payouts.is_empty() {
        writeln!(writer, "  no eligible candidates")?;
    } else {
        let max_payout = report
            .distribution
            .payouts
            .values()
            .fold(0.0_f64, |max, v| max.max(*v));
        for (id, amount) in &report.distribution.payouts {
            writeln!(
                writer,
                "  {:<16} {}  {:>12}",
                id.as_str(),
                share_bar(*amount, max_payout),
                format_amount(*amount)
            )?;
        }
    }

    writeln!(
        writer,
        "Eligible weight:   {}",
        format_amount(report.distribution.eligible_weight_total)
    )?;
    writeln!(
        writer,
        "Total distributed: {}",
        format_amount(report.distribution.total_distributed)
    )?;
    writeln!(
        writer,
        "Residual:          {}",
        format_amount(report.residual)
    )?;

    Ok(())
}
