//! Movie entity model and DTOs.

use magicstream_core::types::DbId;
use magicstream_core::validation::not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::genre::Genre;
use super::ranking::Ranking;

/// Full movie row from the `movies` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: DbId,
    /// Business key, e.g. `tt0133093`.
    pub imdb_id: String,
    pub title: String,
    pub poster_path: String,
    pub youtube_id: String,
    #[sqlx(json)]
    pub genre: Vec<Genre>,
    pub admin_review: String,
    #[sqlx(flatten)]
    pub ranking: Ranking,
}

/// DTO for inserting a new movie.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMovie {
    #[validate(custom(function = "not_blank"))]
    pub imdb_id: String,
    #[validate(length(min = 2, max = 500))]
    pub title: String,
    #[validate(url)]
    pub poster_path: String,
    #[validate(custom(function = "not_blank"))]
    pub youtube_id: String,
    #[validate(length(min = 1), nested)]
    pub genre: Vec<Genre>,
    #[serde(default)]
    pub admin_review: String,
    #[validate(nested)]
    pub ranking: Ranking,
}

impl Movie {
    /// Materialize a stored movie from its create DTO.
    pub fn from_create(id: DbId, input: &CreateMovie) -> Self {
        Self {
            id,
            imdb_id: input.imdb_id.clone(),
            title: input.title.clone(),
            poster_path: input.poster_path.clone(),
            youtube_id: input.youtube_id.clone(),
            genre: input.genre.clone(),
            admin_review: input.admin_review.clone(),
            ranking: input.ranking.clone(),
        }
    }

    /// True if any of this movie's genres is named in `names`.
    pub fn has_any_genre(&self, names: &[String]) -> bool {
        self.genre
            .iter()
            .any(|g| names.iter().any(|n| n == &g.genre_name))
    }
}
