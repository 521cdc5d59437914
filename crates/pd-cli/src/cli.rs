//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Capped proportional payout distributor.
///
/// Splits gross revenue into fixed-fraction buckets and distributes the
/// holder bucket across weighted candidates, enforcing a per-candidate
/// maximum share of the pool.
#[derive(Debug, Parser)]
#[command(name = "pd", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Preview the base split of a gross amount.
    Split {
        /// Gross amount to split.
        #[arg(long)]
        gross: f64,

        /// Emit JSON instead of the human-readable table.
        #[arg(long)]
        json: bool,
    },

    /// Run one capped distribution over a candidate file.
    Distribute {
        /// Pool amount to distribute.
        #[arg(long)]
        pool: f64,

        /// Path to a JSON array of candidates.
        #[arg(long)]
        candidates: PathBuf,

        /// Cap fraction override, in (0, 1]. Defaults to the configured value.
        #[arg(long)]
        cap: Option<f64>,

        /// Exclude flagged candidates for this run.
        #[arg(long)]
        exclude_flagged: bool,

        /// Emit JSON instead of the human-readable table.
        #[arg(long)]
        json: bool,
    },

    /// Full pipeline: split the gross, then pay out the pool bucket.
    Report {
        /// Gross amount for the run.
        #[arg(long)]
        gross: f64,

        /// Path to a JSON array of candidates.
        #[arg(long)]
        candidates: PathBuf,

        /// Emit JSON instead of the human-readable table.
        #[arg(long)]
        json: bool,
    },
}
