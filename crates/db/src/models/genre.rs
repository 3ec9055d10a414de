//! Genre tags attached to movies and user preferences.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row of the `genres` table. Also embedded (as JSONB) in movies and users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Genre {
    #[validate(range(min = 1))]
    pub genre_id: i32,
    #[validate(length(min = 2, max = 100))]
    pub genre_name: String,
}
