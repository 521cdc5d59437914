//! Candidate model and the pre-distribution filter.

use serde::{Deserialize, Serialize};

use crate::types::CandidateId;

const fn default_true() -> bool {
    true
}

/// A participant eligible for a share of a distribution pool.
///
/// Candidates are call-scoped value objects: constructed from caller input
/// (typically a JSON file or an upstream ledger query) immediately before a
/// run and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Opaque unique key, stable across calls. Payout maps are keyed by it.
    pub id: CandidateId,

    /// Optional human-readable annotation. No effect on computation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Entitlement basis, e.g. a time-weighted average balance.
    /// Must be non-negative; zero-weight candidates never receive a payout.
    pub weight: f64,

    /// Whether the candidate participates at all. Absent means eligible.
    #[serde(default = "default_true")]
    pub eligible: bool,

    /// Advisory flag; whether it excludes the candidate is decided per run
    /// by [`DistributionConfig::exclude_flagged`](crate::DistributionConfig).
    #[serde(default)]
    pub flagged: bool,
}

impl Candidate {
    /// Creates an eligible, unflagged candidate.
    pub fn new(id: CandidateId, weight: f64) -> Self {
        Self {
            id,
            label: None,
            weight,
            eligible: true,
            flagged: false,
        }
    }
}

/// Reduces a raw candidate list to the subset participating in one run.
///
/// A candidate passes iff it is eligible, carries strictly positive weight,
/// and is not excluded by the flag policy. Order is preserved; amounts never
/// depend on it, but deterministic iteration keeps logs reproducible.
///
/// An empty result is valid and means "nothing to distribute". Weight sign
/// is NOT validated here; the distributor rejects negative weights for the
/// whole call before filtering.
pub fn filter_candidates(candidates: &[Candidate], exclude_flagged: bool) -> Vec<&Candidate> {
    candidates
        .iter()
        .filter(|c| c.eligible && c.weight > 0.0 && !(exclude_flagged && c.flagged))
        .collect()
}
