use std::time::Duration;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors surfaced by every repository implementation.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("Duplicate value violates unique constraint: {0}")]
    Conflict(String),

    /// The operation did not finish within its time budget.
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    /// Any other driver or storage error.
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return RepoError::Conflict(constraint);
            }
        }
        match err {
            sqlx::Error::PoolTimedOut => RepoError::Timeout(Duration::ZERO),
            other => RepoError::Database(other),
        }
    }
}

impl RepoError {
    /// True for failures caused by an unreachable or slow database.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            RepoError::Timeout(_)
                | RepoError::Database(sqlx::Error::Io(_))
                | RepoError::Database(sqlx::Error::PoolClosed)
        )
    }
}
