//! Repository for the `users` table.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use magicstream_core::types::{DbId, Timestamp};

use super::UserRepository;
use crate::bounded;
use crate::error::RepoError;
use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, first_name, last_name, email, password_hash, role, \
                        created_at, updated_at, token, refresh_token, favourite_genres";

/// Postgres-backed [`UserRepository`].
#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
    timeout: Duration,
}

impl UserRepo {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UserRepository for UserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        bounded(
            self.timeout,
            sqlx::query_as::<_, User>(&query)
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE user_id = $1");
        bounded(
            self.timeout,
            sqlx::query_as::<_, User>(&query)
                .bind(user_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn count_by_email(&self, email: &str) -> Result<i64, RepoError> {
        bounded(
            self.timeout,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn insert(&self, input: &CreateUser) -> Result<DbId, RepoError> {
        bounded(
            self.timeout,
            sqlx::query_scalar::<_, DbId>(
                "INSERT INTO users
                    (user_id, first_name, last_name, email, password_hash, role, favourite_genres)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING id",
            )
            .bind(&input.user_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .bind(Json(&input.favourite_genres))
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
        updated_at: Timestamp,
    ) -> Result<bool, RepoError> {
        let result = bounded(
            self.timeout,
            sqlx::query(
                "UPDATE users SET token = $2, refresh_token = $3, updated_at = $4
                 WHERE user_id = $1",
            )
            .bind(user_id)
            .bind(token)
            .bind(refresh_token)
            .bind(updated_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
