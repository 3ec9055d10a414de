//! User account model and DTOs.

use magicstream_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::genre::Genre;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    /// Public identifier generated at registration.
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Most recently issued access token. Audit trail only.
    pub token: Option<String>,
    /// Most recently issued refresh token. Audit trail only.
    pub refresh_token: Option<String>,
    #[sqlx(json)]
    pub favourite_genres: Vec<Genre>,
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub favourite_genres: Vec<Genre>,
}
