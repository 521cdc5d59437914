//! Base splitter: partitions a gross amount into named fraction buckets.

use serde::Serialize;

use crate::error::DistributionError;
use crate::types::BucketName;

/// Tolerance for the fraction-sum check. Four quarters entered as 0.25 must
/// not be rejected because they sum to 1.0000000000000002 in binary.
const SUM_TOLERANCE: f64 = 1e-9;

/// An immutable, validated table of named split fractions.
///
/// Fractions are validated once at construction, not per call: every
/// fraction must be non-negative and the sum must not exceed 1. A table
/// summing below 1 is allowed; the gap shows up as [`SplitOutcome::remainder`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplitTable {
    entries: Vec<(BucketName, f64)>,
}

impl SplitTable {
    /// Builds a table from `(bucket, fraction)` entries, preserving order.
    pub fn new(entries: Vec<(BucketName, f64)>) -> Result<Self, DistributionError> {
        for (name, fraction) in &entries {
            if *fraction < 0.0 {
                return Err(DistributionError::NegativeFraction {
                    bucket: name.to_string(),
                    value: *fraction,
                });
            }
        }
        for (i, (name, _)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(seen, _)| seen == name) {
                return Err(DistributionError::DuplicateBucket {
                    bucket: name.to_string(),
                });
            }
        }
        let sum: f64 = entries.iter().map(|(_, f)| f).sum();
        if sum > 1.0 + SUM_TOLERANCE {
            return Err(DistributionError::FractionsExceedWhole { sum });
        }
        Ok(Self { entries })
    }

    /// Returns the fraction for a bucket, if present.
    pub fn fraction(&self, name: &BucketName) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| *f)
    }

    /// Iterates entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&BucketName, f64)> {
        self.entries.iter().map(|(n, f)| (n, *f))
    }

    /// Partitions `gross` into one amount per bucket.
    ///
    /// Amounts are `gross × fraction` at native f64 precision; no rounding
    /// happens here so that chained computations (feeding one bucket into
    /// the capped distributor) do not compound rounding error. Callers
    /// needing currency-safe rounding round at the presentation boundary.
    pub fn split(&self, gross: f64) -> Result<SplitOutcome, DistributionError> {
        if gross < 0.0 {
            return Err(DistributionError::NegativeAmount {
                field: "gross amount",
                value: gross,
            });
        }
        let buckets = self
            .entries
            .iter()
            .map(|(name, fraction)| Bucket {
                name: name.clone(),
                fraction: *fraction,
                amount: gross * fraction,
            })
            .collect();
        Ok(SplitOutcome { gross, buckets })
    }
}

/// One named share of a base split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub name: BucketName,
    pub fraction: f64,
    pub amount: f64,
}

/// The result of splitting one gross amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitOutcome {
    gross: f64,
    buckets: Vec<Bucket>,
}

impl SplitOutcome {
    /// The gross amount the split was computed from.
    pub fn gross(&self) -> f64 {
        self.gross
    }

    /// Buckets in table order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Returns the amount for a bucket, if present.
    pub fn amount(&self, name: &BucketName) -> Option<f64> {
        self.buckets
            .iter()
            .find(|b| &b.name == name)
            .map(|b| b.amount)
    }

    /// The part of the gross not assigned to any bucket (0 for tables
    /// summing to exactly 1).
    pub fn remainder(&self) -> f64 {
        let assigned: f64 = self.buckets.iter().map(|b| b.amount).sum();
        (self.gross - assigned).max(0.0)
    }
}
