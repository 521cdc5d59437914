//! Report orchestration: base split feeding one bucket into the capped
//! distributor, merged into a single caller-facing view.

use rayon::prelude::*;
use serde::Serialize;

use crate::candidate::Candidate;
use crate::distribute::{DistributionConfig, DistributionResult, distribute_capped};
use crate::error::DistributionError;
use crate::split::{Bucket, SplitTable};
use crate::types::BucketName;

/// How a payout run is composed: which split to apply, which bucket feeds
/// the weighted distribution, and the distribution options.
///
/// Validated once at construction; the pool bucket must exist in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutPolicy {
    split: SplitTable,
    pool_bucket: BucketName,
    distribution: DistributionConfig,
}

impl PayoutPolicy {
    pub fn new(
        split: SplitTable,
        pool_bucket: BucketName,
        distribution: DistributionConfig,
    ) -> Result<Self, DistributionError> {
        if split.fraction(&pool_bucket).is_none() {
            return Err(DistributionError::UnknownPoolBucket {
                bucket: pool_bucket.to_string(),
            });
        }
        Ok(Self {
            split,
            pool_bucket,
            distribution,
        })
    }

    pub fn split(&self) -> &SplitTable {
        &self.split
    }

    pub fn pool_bucket(&self) -> &BucketName {
        &self.pool_bucket
    }

    pub fn distribution(&self) -> &DistributionConfig {
        &self.distribution
    }
}

/// One gross amount plus the candidate set it is distributed over.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub gross: f64,
    pub candidates: Vec<Candidate>,
}

/// The merged view of one payout run: the base split, the capped
/// distribution of the pool bucket, and the undistributed residual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutReport {
    pub gross: f64,
    pub buckets: Vec<Bucket>,
    pub pool_bucket: BucketName,
    pub pool_amount: f64,
    pub distribution: DistributionResult,
    pub residual: f64,
}

impl PayoutReport {
    /// Effective overall share for a stakeholder who both holds a stated
    /// fraction of the split and a weighted position in the pool:
    /// `stated + pool_fraction × weight / eligible_weight_total`.
    ///
    /// Display arithmetic only; with no eligible weight the pool term is 0.
    pub fn effective_fraction(&self, stated: f64, weight: f64) -> f64 {
        let pool_fraction = self
            .buckets
            .iter()
            .find(|b| b.name == self.pool_bucket)
            .map_or(0.0, |b| b.fraction);
        if self.distribution.eligible_weight_total <= 0.0 {
            return stated;
        }
        stated + pool_fraction * (weight / self.distribution.eligible_weight_total)
    }
}

/// Runs the full pipeline for one request: split the gross, then distribute
/// the pool bucket across the candidates. Purely compositional; every
/// numeric rule lives in the components it calls.
pub fn run_report(
    gross: f64,
    candidates: &[Candidate],
    policy: &PayoutPolicy,
) -> Result<PayoutReport, DistributionError> {
    let outcome = policy.split.split(gross)?;
    // The pool bucket is validated at policy construction.
    let pool_amount = outcome
        .amount(&policy.pool_bucket)
        .ok_or_else(|| DistributionError::UnknownPoolBucket {
            bucket: policy.pool_bucket.to_string(),
        })?;

    let distribution = distribute_capped(pool_amount, candidates, &policy.distribution)?;
    let residual = distribution.residual(pool_amount);

    Ok(PayoutReport {
        gross,
        buckets: outcome.buckets().to_vec(),
        pool_bucket: policy.pool_bucket.clone(),
        pool_amount,
        distribution,
        residual,
    })
}

/// Runs independent report requests in parallel.
///
/// Each computation is pure and owns its input, so requests need no
/// coordination; result order matches request order.
pub fn run_reports(
    requests: &[ReportRequest],
    policy: &PayoutPolicy,
) -> Vec<Result<PayoutReport, DistributionError>> {
    requests
        .par_iter()
        .map(|request| run_report(request.gross, &request.candidates, policy))
        .collect()
}
