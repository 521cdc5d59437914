//! Shared rendering and input helpers for subcommands.

use std::path::Path;

use anyhow::{Context, Result};

use pd_core::Candidate;

/// Loads a candidate set from a JSON array file.
pub fn load_candidates(path: &Path) -> Result<Vec<Candidate>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read candidate file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse candidate file {}", path.display()))
}

/// Formats an amount with two decimal places.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

/// Formats a fraction as a percentage with one decimal place.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Generates a 10-character share bar.
/// Values <5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn share_bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value / max;
    let filled = if ratio < 0.05 && value > 0.0 {
        1
    } else {
        (ratio * 10.0).round() as usize
    };
    let filled = filled.min(10);

    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(10 - filled));
    bar
}
