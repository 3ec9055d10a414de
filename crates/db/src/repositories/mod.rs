//! Repository layer.
//!
//! Each entity has an `async_trait` repository contract plus a Postgres
//! implementation holding the pool and a per-operation timeout. Handlers and
//! the ranking pipeline depend on the traits only, so tests can inject the
//! [`memory`] implementations instead.

use async_trait::async_trait;
use magicstream_core::types::{DbId, Timestamp};

use crate::error::RepoError;
use crate::models::genre::Genre;
use crate::models::movie::{CreateMovie, Movie};
use crate::models::ranking::Ranking;
use crate::models::user::{CreateUser, User};

pub mod genre_repo;
pub mod memory;
pub mod movie_repo;
pub mod ranking_repo;
pub mod user_repo;

pub use genre_repo::GenreRepo;
pub use movie_repo::MovieRepo;
pub use ranking_repo::RankingRepo;
pub use user_repo::UserRepo;

/// Persistence contract for movies.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// All movies, in insertion order.
    async fn find_all(&self) -> Result<Vec<Movie>, RepoError>;

    /// Look up a movie by its business key.
    async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Option<Movie>, RepoError>;

    /// Movies sharing at least one genre name with `genre_names`, ordered by
    /// ascending ranking value, at most `limit` rows.
    async fn find_by_genres(
        &self,
        genre_names: &[String],
        limit: i64,
    ) -> Result<Vec<Movie>, RepoError>;

    /// Insert a movie, returning its internal id. Duplicate `imdb_id` fails
    /// with [`RepoError::Conflict`].
    async fn insert(&self, input: &CreateMovie) -> Result<DbId, RepoError>;

    /// Set the admin review and ranking in one statement. Returns the number
    /// of matched rows (0 when no movie has that `imdb_id`).
    async fn update_review_and_ranking(
        &self,
        imdb_id: &str,
        admin_review: &str,
        ranking: &Ranking,
    ) -> Result<u64, RepoError>;
}

/// Persistence contract for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, RepoError>;

    async fn count_by_email(&self, email: &str) -> Result<i64, RepoError>;

    /// Insert a user, returning its internal id. Duplicate email or `user_id`
    /// fails with [`RepoError::Conflict`] even if a prior count said otherwise.
    async fn insert(&self, input: &CreateUser) -> Result<DbId, RepoError>;

    /// Record the most recently issued token pair. Returns `true` if the user
    /// row was updated.
    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
        updated_at: Timestamp,
    ) -> Result<bool, RepoError>;
}

/// Read contract for the sentiment vocabulary.
#[async_trait]
pub trait SentimentRepository: Send + Sync {
    /// Every vocabulary entry in stored order, sentinel included.
    async fn list_labels(&self) -> Result<Vec<Ranking>, RepoError>;
}

/// Read contract for the genre catalog.
#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Genre>, RepoError>;
}
