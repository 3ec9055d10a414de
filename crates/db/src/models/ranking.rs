//! Sentiment vocabulary entries.

use magicstream_core::ranking::SENTINEL_RANK_VALUE;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A `{name, rank}` pair from the `rankings` vocabulary.
///
/// Movies embed a copy by value, so later vocabulary edits never rewrite
/// rankings that were already stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Ranking {
    pub ranking_value: i32,
    #[validate(length(min = 1))]
    pub ranking_name: String,
}

impl Ranking {
    pub fn new(ranking_name: impl Into<String>, ranking_value: i32) -> Self {
        Self {
            ranking_name: ranking_name.into(),
            ranking_value,
        }
    }

    /// True for the reserved "unranked" entry.
    pub fn is_sentinel(&self) -> bool {
        self.ranking_value == SENTINEL_RANK_VALUE
    }
}
