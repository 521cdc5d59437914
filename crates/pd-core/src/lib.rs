//! Core distribution engine for the payout distributor.
//!
//! This crate contains the fundamental types and logic for:
//! - Candidate filtering: eligibility and flag-exclusion rules
//! - Base splitting: partitioning gross revenue into named buckets
//! - Capped distribution: water-filling allocation under a per-candidate cap
//! - Reporting: composing the above into a single payout report
//!
//! The engine is pure: every entry point is a function of caller-owned input
//! to a freshly-constructed output value. There is no persistent state and
//! no I/O, so identical inputs always reproduce identical payouts, which is
//! what makes runs auditable after the fact.

mod candidate;
mod distribute;
mod error;
mod report;
mod split;
pub mod types;

pub use candidate::{Candidate, filter_candidates};
pub use distribute::{DistributionConfig, DistributionResult, distribute_capped};
pub use error::DistributionError;
pub use report::{PayoutPolicy, PayoutReport, ReportRequest, run_report, run_reports};
pub use split::{Bucket, SplitOutcome, SplitTable};
