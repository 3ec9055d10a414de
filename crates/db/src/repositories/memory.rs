//! In-memory repository implementations.
//!
//! They honour the same unique keys as the Postgres schema (`uq_movies_imdb_id`,
//! `uq_users_email`, `uq_users_user_id`) so conflict handling can be exercised
//! without a database. Used by tests and for running the server without Postgres.

use async_trait::async_trait;
use magicstream_core::ranking::recommendation_order;
use magicstream_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use super::{GenreRepository, MovieRepository, SentimentRepository, UserRepository};
use crate::error::RepoError;
use crate::models::genre::Genre;
use crate::models::movie::{CreateMovie, Movie};
use crate::models::ranking::Ranking;
use crate::models::user::{CreateUser, User};

/// Movies kept in insertion order.
#[derive(Default)]
pub struct InMemoryMovieRepo {
    movies: RwLock<Vec<Movie>>,
}

impl InMemoryMovieRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing rows (ids are taken as given).
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self {
            movies: RwLock::new(movies),
        }
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepo {
    async fn find_all(&self) -> Result<Vec<Movie>, RepoError> {
        Ok(self.movies.read().await.clone())
    }

    async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Option<Movie>, RepoError> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.imdb_id == imdb_id).cloned())
    }

    async fn find_by_genres(
        &self,
        genre_names: &[String],
        limit: i64,
    ) -> Result<Vec<Movie>, RepoError> {
        let movies = self.movies.read().await;
        let mut matched: Vec<Movie> = movies
            .iter()
            .filter(|m| m.has_any_genre(genre_names))
            .cloned()
            .collect();
        matched.sort_by_key(|m| (recommendation_order(m.ranking.ranking_value), m.id));
        matched.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(matched)
    }

    async fn insert(&self, input: &CreateMovie) -> Result<DbId, RepoError> {
        let mut movies = self.movies.write().await;
        if movies.iter().any(|m| m.imdb_id == input.imdb_id) {
            return Err(RepoError::Conflict("uq_movies_imdb_id".into()));
        }
        let id = movies.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        movies.push(Movie::from_create(id, input));
        Ok(id)
    }

    async fn update_review_and_ranking(
        &self,
        imdb_id: &str,
        admin_review: &str,
        ranking: &Ranking,
    ) -> Result<u64, RepoError> {
        let mut movies = self.movies.write().await;
        match movies.iter_mut().find(|m| m.imdb_id == imdb_id) {
            Some(movie) => {
                movie.admin_review = admin_review.to_string();
                movie.ranking = ranking.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// User accounts keyed by internal id.
#[derive(Default)]
pub struct InMemoryUserRepo {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn count_by_email(&self, email: &str) -> Result<i64, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| u.email == email).count() as i64)
    }

    async fn insert(&self, input: &CreateUser) -> Result<DbId, RepoError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == input.email) {
            return Err(RepoError::Conflict("uq_users_email".into()));
        }
        if users.iter().any(|u| u.user_id == input.user_id) {
            return Err(RepoError::Conflict("uq_users_user_id".into()));
        }
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let now = chrono::Utc::now();
        users.push(User {
            id,
            user_id: input.user_id.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role.clone(),
            created_at: now,
            updated_at: now,
            token: None,
            refresh_token: None,
            favourite_genres: input.favourite_genres.clone(),
        });
        Ok(id)
    }

    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
        updated_at: Timestamp,
    ) -> Result<bool, RepoError> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.user_id == user_id) {
            Some(user) => {
                user.token = Some(token.to_string());
                user.refresh_token = Some(refresh_token.to_string());
                user.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Fixed sentiment vocabulary.
pub struct InMemorySentimentRepo {
    labels: Vec<Ranking>,
}

impl InMemorySentimentRepo {
    pub fn new(labels: Vec<Ranking>) -> Self {
        Self { labels }
    }
}

#[async_trait]
impl SentimentRepository for InMemorySentimentRepo {
    async fn list_labels(&self) -> Result<Vec<Ranking>, RepoError> {
        Ok(self.labels.clone())
    }
}

/// Fixed genre catalog.
pub struct InMemoryGenreRepo {
    genres: Vec<Genre>,
}

impl InMemoryGenreRepo {
    pub fn new(genres: Vec<Genre>) -> Self {
        Self { genres }
    }
}

#[async_trait]
impl GenreRepository for InMemoryGenreRepo {
    async fn list_all(&self) -> Result<Vec<Genre>, RepoError> {
        let mut genres = self.genres.clone();
        genres.sort_by_key(|g| g.genre_id);
        Ok(genres)
    }
}
