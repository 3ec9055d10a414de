//! Repository for the `movies` table.

use std::time::Duration;

use async_trait::async_trait;
use magicstream_core::ranking::{SENTINEL_RANK_VALUE, UNMATCHED_RANK_VALUE};
use magicstream_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use super::MovieRepository;
use crate::bounded;
use crate::error::RepoError;
use crate::models::movie::{CreateMovie, Movie};
use crate::models::ranking::Ranking;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, imdb_id, title, poster_path, youtube_id, genre, admin_review, \
                        ranking_value, ranking_name";

/// Postgres-backed [`MovieRepository`].
#[derive(Clone)]
pub struct MovieRepo {
    pool: PgPool,
    timeout: Duration,
}

impl MovieRepo {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl MovieRepository for MovieRepo {
    async fn find_all(&self) -> Result<Vec<Movie>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM movies ORDER BY id");
        bounded(
            self.timeout,
            sqlx::query_as::<_, Movie>(&query).fetch_all(&self.pool),
        )
        .await
    }

    async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Option<Movie>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE imdb_id = $1");
        bounded(
            self.timeout,
            sqlx::query_as::<_, Movie>(&query)
                .bind(imdb_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn find_by_genres(
        &self,
        genre_names: &[String],
        limit: i64,
    ) -> Result<Vec<Movie>, RepoError> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE EXISTS (
                 SELECT 1 FROM jsonb_array_elements(genre) AS g
                 WHERE g->>'genre_name' = ANY($1)
             )
             ORDER BY (ranking_value <= {UNMATCHED_RANK_VALUE}
                       OR ranking_value = {SENTINEL_RANK_VALUE}),
                      ranking_value ASC, id ASC
             LIMIT $2"
        );
        bounded(
            self.timeout,
            sqlx::query_as::<_, Movie>(&query)
                .bind(genre_names)
                .bind(limit)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn insert(&self, input: &CreateMovie) -> Result<DbId, RepoError> {
        bounded(
            self.timeout,
            sqlx::query_scalar::<_, DbId>(
                "INSERT INTO movies
                    (imdb_id, title, poster_path, youtube_id, genre, admin_review,
                     ranking_value, ranking_name)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING id",
            )
            .bind(&input.imdb_id)
            .bind(&input.title)
            .bind(&input.poster_path)
            .bind(&input.youtube_id)
            .bind(Json(&input.genre))
            .bind(&input.admin_review)
            .bind(input.ranking.ranking_value)
            .bind(&input.ranking.ranking_name)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn update_review_and_ranking(
        &self,
        imdb_id: &str,
        admin_review: &str,
        ranking: &Ranking,
    ) -> Result<u64, RepoError> {
        let result = bounded(
            self.timeout,
            sqlx::query(
                "UPDATE movies SET
                    admin_review = $2,
                    ranking_value = $3,
                    ranking_name = $4,
                    updated_at = NOW()
                 WHERE imdb_id = $1",
            )
            .bind(imdb_id)
            .bind(admin_review)
            .bind(ranking.ranking_value)
            .bind(&ranking.ranking_name)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected())
    }
}
