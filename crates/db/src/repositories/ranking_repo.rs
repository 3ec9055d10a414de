//! Repository for the `rankings` vocabulary table.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use super::SentimentRepository;
use crate::bounded;
use crate::error::RepoError;
use crate::models::ranking::Ranking;

/// Postgres-backed [`SentimentRepository`].
#[derive(Clone)]
pub struct RankingRepo {
    pool: PgPool,
    timeout: Duration,
}

impl RankingRepo {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl SentimentRepository for RankingRepo {
    async fn list_labels(&self) -> Result<Vec<Ranking>, RepoError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Ranking>(
                "SELECT ranking_value, ranking_name FROM rankings ORDER BY id",
            )
            .fetch_all(&self.pool),
        )
        .await
    }
}
