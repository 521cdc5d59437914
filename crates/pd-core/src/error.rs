//! Engine error taxonomy.

use thiserror::Error;

/// Errors reported by the distribution engine.
///
/// Every variant is a caller error detected before any computation runs;
/// no partial results are ever returned alongside one. Empty candidate
/// sets, zero pools, and caps too small to consume the whole pool are
/// ordinary results, not errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DistributionError {
    /// A gross or pool amount was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    /// A split fraction was negative.
    #[error("fraction for bucket `{bucket}` must be non-negative, got {value}")]
    NegativeFraction { bucket: String, value: f64 },

    /// The split fractions sum above 1, which would mint value.
    #[error("split fractions sum to {sum}, must not exceed 1")]
    FractionsExceedWhole { sum: f64 },

    /// The cap fraction was outside `(0, 1]`.
    #[error("cap fraction must be within (0, 1], got {value}")]
    CapOutOfRange { value: f64 },

    /// A candidate carried a negative weight.
    ///
    /// The whole call fails rather than dropping the candidate: dropping
    /// would silently change the eligible weight total and with it every
    /// other candidate's payout.
    #[error("candidate `{id}` has negative weight {weight}")]
    NegativeWeight { id: String, weight: f64 },

    /// Two split entries share the same bucket name.
    #[error("bucket `{bucket}` appears more than once in the split table")]
    DuplicateBucket { bucket: String },

    /// The requested pool bucket is not part of the split table.
    #[error("pool bucket `{bucket}` is not defined in the split table")]
    UnknownPoolBucket { bucket: String },
}
