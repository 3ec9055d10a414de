//! Sentiment ranking constants and the out-of-vocabulary policy.
//!
//! The vocabulary itself lives in the `rankings` table; this module only holds
//! the values every layer must agree on.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Rank value reserved for "no ranking assigned". Labels carrying it are never
/// offered to the classifier.
pub const SENTINEL_RANK_VALUE: i32 = 999;

/// Rank stored when the classifier answers with a label outside the vocabulary
/// and the policy passes it through.
pub const UNMATCHED_RANK_VALUE: i32 = 0;

/// Token in the prompt template replaced by the comma-joined candidate labels.
pub const RANKINGS_PLACEHOLDER: &str = "{rankings}";

/// True for rank values outside the vocabulary range: the sentinel and any
/// pass-through value at or below [`UNMATCHED_RANK_VALUE`].
pub fn is_unranked_value(value: i32) -> bool {
    value <= UNMATCHED_RANK_VALUE || value == SENTINEL_RANK_VALUE
}

/// Sort key putting vocabulary ranks first, best (lowest) first, and every
/// unranked value after them.
pub fn recommendation_order(value: i32) -> (bool, i32) {
    (is_unranked_value(value), value)
}

/// What to do when the classifier returns a label that is not a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnrankedPolicy {
    /// Persist the raw label with [`UNMATCHED_RANK_VALUE`].
    #[default]
    PassThrough,
    /// Fail the operation and persist nothing.
    Reject,
    /// Persist the sentinel label and rank instead of the raw label.
    Sentinel,
}

impl UnrankedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnrankedPolicy::PassThrough => "pass_through",
            UnrankedPolicy::Reject => "reject",
            UnrankedPolicy::Sentinel => "sentinel",
        }
    }
}

impl fmt::Display for UnrankedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnrankedPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass_through" | "passthrough" => Ok(UnrankedPolicy::PassThrough),
            "reject" => Ok(UnrankedPolicy::Reject),
            "sentinel" => Ok(UnrankedPolicy::Sentinel),
            other => Err(CoreError::Validation(format!(
                "Unknown unranked policy '{other}'. Must be one of: pass_through, reject, sentinel"
            ))),
        }
    }
}
