//! Repository for the `genres` table.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use super::GenreRepository;
use crate::bounded;
use crate::error::RepoError;
use crate::models::genre::Genre;

/// Postgres-backed [`GenreRepository`].
#[derive(Clone)]
pub struct GenreRepo {
    pool: PgPool,
    timeout: Duration,
}

impl GenreRepo {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl GenreRepository for GenreRepo {
    async fn list_all(&self) -> Result<Vec<Genre>, RepoError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Genre>("SELECT genre_id, genre_name FROM genres ORDER BY genre_id")
                .fetch_all(&self.pool),
        )
        .await
    }
}
