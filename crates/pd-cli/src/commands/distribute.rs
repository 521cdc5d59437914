//! Distribute command: one capped distribution over a candidate file.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use pd_core::{DistributionConfig, DistributionResult, distribute_capped};

use crate::Config;
use crate::commands::util::{format_amount, format_percent, load_candidates, share_bar};

/// JSON payload for `pd distribute --json`.
#[derive(Debug, Serialize)]
struct DistributeJson<'a> {
    generated_at: DateTime<Utc>,
    pool: f64,
    cap_fraction: f64,
    exclude_flagged: bool,
    #[serde(flatten)]
    result: &'a DistributionResult,
    residual: f64,
}

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    pool: f64,
    candidates_path: &Path,
    cap_override: Option<f64>,
    exclude_flagged: bool,
    json: bool,
) -> Result<()> {
    let candidates = load_candidates(candidates_path)?;
    let dist_config = config.distribution_config(cap_override, exclude_flagged);

    let result = distribute_capped(pool, &candidates, &dist_config)
        .context("distribution rejected")?;
    tracing::debug!(
        total = result.total_distributed,
        candidates = result.payouts.len(),
        "distribution computed"
    );

    render(writer, pool, &dist_config, &result, json)
}

fn render<W: Write>(
    writer: &mut W,
    pool: f64,
    dist_config: &DistributionConfig,
    result: &DistributionResult,
    json: bool,
) -> Result<()> {
    if json {
        let payload = DistributeJson {
            generated_at: Utc::now(),
            pool,
            cap_fraction: dist_config.cap_fraction,
            exclude_flagged: dist_config.exclude_flagged,
            result,
            residual: result.residual(pool),
        };
        serde_json::to_writer_pretty(&mut *writer, &payload)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(
        writer,
        "Distribution of {} (cap {} of pool)",
        format_amount(pool),
        format_percent(dist_config.cap_fraction)
    )?;

    if result.payouts.is_empty() {
        writeln!(writer, "  no eligible candidates")?;
    } else {
        let max_payout = result
            .payouts
            .values()
            .fold(0.0_f64, |max, v| max.max(*v));
        for (id, amount) in &result.payouts {
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
        format_amount(result.eligible_weight_total)
    )?;
    writeln!(
        writer,
        "Total distributed: {}",
        format_amount(result.total_distributed)
    )?;
    writeln!(
        writer,
        "Residual:          {}",
        format_amount(result.residual(pool))
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_candidates(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("candidates.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_distribute_json_has_payouts_and_residual() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_candidates(
            &temp,
            r#"[{"id": "a", "weight": 90.0}, {"id": "b", "weight": 10.0}]"#,
        );

        let config = Config::default();
        let mut output = Vec::new();
        run(&mut output, &config, 1000.0, &path, Some(0.5), false, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["payouts"]["a"], 500.0);
        assert_eq!(value["payouts"]["b"], 500.0);
        assert_eq!(value["total_distributed"], 1000.0);
        assert_eq!(value["residual"], 0.0);
        assert_eq!(value["cap_fraction"], 0.5);
    }

    #[test]
    fn test_distribute_human_output_lists_candidates() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_candidates(
            &temp,
            r#"[{"id": "a", "weight": 50.0}, {"id": "b", "weight": 50.0}]"#,
        );

        let config = Config::default();
        let mut output = Vec::new();
        run(&mut output, &config, 100.0, &path, None, false, false).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Distribution of 100.00"));
        assert!(text.contains("a"));
        assert!(text.contains("50.00"));
        assert!(text.contains("Residual:          0.00"));
    }

    #[test]
    fn test_distribute_negative_weight_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_candidates(&temp, r#"[{"id": "a", "weight": -5.0}]"#);

        let config = Config::default();
        let mut output = Vec::new();
        let err = run(&mut output, &config, 100.0, &path, None, false, true).unwrap_err();
        assert!(format!("{err:#}").contains("negative weight"));
    }

    #[test]
    fn test_distribute_empty_file_is_valid() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_candidates(&temp, "[]");

        let config = Config::default();
        let mut output = Vec::new();
        run(&mut output, &config, 100.0, &path, None, false, false).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("no eligible candidates"));
        assert!(text.contains("Residual:          100.00"));
    }
}
