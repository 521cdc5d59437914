//! Capped weighted distribution.
//!
//! Distributes a pool proportionally to candidate weight, subject to the
//! rule that no single candidate may receive more than `cap_fraction` of
//! the pool. Candidates pushed over the cap are frozen at the cap value and
//! the freed remainder is redistributed among the rest until the allocation
//! is stable (water-filling).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, filter_candidates};
use crate::error::DistributionError;
use crate::types::CandidateId;

/// Relative tolerance for the cap comparison. A tentative share is frozen
/// only when it exceeds the cap by more than this; a share mathematically
/// equal to the cap is assigned normally and happens to equal it, so float
/// noise at the boundary cannot flip a candidate between frozen and not
/// across identical runs.
const CAP_EPSILON: f64 = 1e-9;

const fn default_cap_fraction() -> f64 {
    1.0
}

/// Per-run distribution options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Treat flagged candidates as ineligible for this run only. Does not
    /// mutate the candidate's persisted state.
    #[serde(default)]
    pub exclude_flagged: bool,

    /// Maximum fraction of the ORIGINAL pool any one candidate may receive,
    /// in `(0, 1]`. 1.0 disables capping (pure proportional split).
    #[serde(default = "default_cap_fraction")]
    pub cap_fraction: f64,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            exclude_flagged: false,
            cap_fraction: 1.0,
        }
    }
}

/// Outcome of one capped distribution run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionResult {
    /// Payout per candidate, keyed by ID. Candidates removed by filtering
    /// are absent, not present with zero.
    pub payouts: BTreeMap<CandidateId, f64>,

    /// Sum of all payouts. Equals the pool when no candidate is capped;
    /// never exceeds it.
    pub total_distributed: f64,

    /// Sum of weights of candidates that survived filtering, before any
    /// capping.
    pub eligible_weight_total: f64,
}

impl DistributionResult {
    fn empty() -> Self {
        Self {
            payouts: BTreeMap::new(),
            total_distributed: 0.0,
            eligible_weight_total: 0.0,
        }
    }

    /// Pool amount left undistributed because the cap made full allocation
    /// impossible. The engine does not invent a destination for it; the
    /// caller decides (roll forward, burn, return to treasury).
    pub fn residual(&self, pool: f64) -> f64 {
        (pool - self.total_distributed).max(0.0)
    }
}

/// Distributes `pool` across `candidates` proportionally to weight, capping
/// every payout at `pool × cap_fraction`.
///
/// Degenerate inputs are valid business states, not errors: an empty
/// candidate set or a zero pool returns an empty result, and a cap too
/// small to consume the whole pool freezes everyone and leaves a residual.
/// The call fails only for a negative pool, a cap fraction outside
/// `(0, 1]`, or any candidate with negative weight — in the last case the
/// whole call is rejected, with no partial payout map.
pub fn distribute_capped(
    pool: f64,
    candidates: &[Candidate],
    config: &DistributionConfig,
) -> Result<DistributionResult, DistributionError> {
    if pool < 0.0 {
        return Err(DistributionError::NegativeAmount {
            field: "pool amount",
            value: pool,
        });
    }
    if !(config.cap_fraction > 0.0 && config.cap_fraction <= 1.0) {
        return Err(DistributionError::CapOutOfRange {
            value: config.cap_fraction,
        });
    }
    // Weight sign is checked on the raw list, before filtering: an
    // ineligible candidate with a negative weight is still a caller error.
    if let Some(bad) = candidates.iter().find(|c| c.weight < 0.0) {
        return Err(DistributionError::NegativeWeight {
            id: bad.id.to_string(),
            weight: bad.weight,
        });
    }

    let participants = filter_candidates(candidates, config.exclude_flagged);
    if participants.is_empty() || pool == 0.0 {
        return Ok(DistributionResult::empty());
    }

    let eligible_weight_total: f64 = participants.iter().map(|c| c.weight).sum();
    // The cap is relative to the ORIGINAL pool, not the shrinking
    // remainder: a participant's cap must not change as others freeze.
    let cap = pool * config.cap_fraction;

    let mut payouts: BTreeMap<CandidateId, f64> = BTreeMap::new();
    let mut active = vec![true; participants.len()];
    let mut remaining_pool = pool;
    let mut remaining_weight = eligible_weight_total;
    let mut pass = 0_u32;

    // Each pass either freezes at least one candidate (strictly shrinking
    // the active set) or terminates, so the loop runs at most n passes.
    while remaining_weight > 0.0 {
        pass += 1;

        // Snapshot the over-cap set against pass-start state so that
        // candidate order cannot affect amounts within a pass.
        let over_cap: Vec<usize> = participants
            .iter()
            .enumerate()
            .filter(|(i, c)| {
                active[*i] && remaining_pool * (c.weight / remaining_weight) > cap * (1.0 + CAP_EPSILON)
            })
            .map(|(i, _)| i)
            .collect();

        if over_cap.is_empty() {
            for (i, c) in participants.iter().enumerate() {
                if active[i] {
                    let share = remaining_pool * (c.weight / remaining_weight);
                    payouts.insert(c.id.clone(), share.max(0.0));
                }
            }
            break;
        }

        for i in over_cap {
            let c = participants[i];
            tracing::debug!(candidate = %c.id, pass, payout = cap, "froze candidate at cap");
            payouts.insert(c.id.clone(), cap);
            remaining_pool -= cap;
            remaining_weight -= c.weight;
            active[i] = false;
        }
        // remaining_weight == 0 here means the cap froze everyone; the
        // leftover pool stays undistributed (residual) and the loop exits.
    }

    let total_distributed: f64 = payouts.values().sum();
    tracing::trace!(
        total_distributed,
        eligible_weight_total,
        passes = pass,
        "distribution complete"
    );

    Ok(DistributionResult {
        payouts,
        total_distributed,
        eligible_weight_total,
    })
}
