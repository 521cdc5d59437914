//! Split command: preview the base split of a gross amount.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use pd_core::Bucket;

use crate::Config;
use crate::commands::util::{format_amount, format_percent};

/// JSON payload for `pd split --json`.
#[derive(Debug, Serialize)]
struct SplitJson<'a> {
    generated_at: DateTime<Utc>,
    gross: f64,
    buckets: &'a [Bucket],
    remainder: f64,
}

pub fn run<W: Write>(writer: &mut W, config: &Config, gross: f64, json: bool) -> Result<()> {
    let table = config.split_table()?;
    let outcome = table.split(gross)?;

    if json {
        let payload = SplitJson {
            generated_at: Utc::now(),
            gross,
            buckets: outcome.buckets(),
            remainder: outcome.remainder(),
        };
        serde_json::to_writer_pretty(&mut *writer, &payload)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "Base split of {}", format_amount(gross))?;
    for bucket in outcome.buckets() {
        writeln!(
            writer,
            "  {:<12} {:>6}  {:>12}",
            bucket.name.as_str(),
            format_percent(bucket.fraction),
            format_amount(bucket.amount)
        )?;
    }
    if outcome.remainder() > 0.0 {
        writeln!(
            writer,
            "  {:<12} {:>6}  {:>12}",
            "(unassigned)",
            "",
            format_amount(outcome.remainder())
        )?;
    }

    Ok(())
}
