//! Handlers for the movie catalog and the admin review.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use magicstream_core::error::CoreError;
use magicstream_core::validation::not_blank;
use magicstream_db::models::movie::{CreateMovie, Movie};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::InsertResult;
use crate::state::AppState;

/// Request body for `PUT|PATCH /movie/{imdb_id}/review`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(custom(function = "not_blank"))]
    pub admin_review: String,
}

/// Response for a successful review update.
#[derive(Debug, Serialize)]
pub struct UpdateReviewResponse {
    pub ranking_name: String,
    pub admin_review: String,
}

/// GET /movies
pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.movies.find_all().await?;
    Ok(Json(movies))
}

/// GET /movie/{imdb_id}
pub async fn get_movie(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(imdb_id): Path<String>,
) -> AppResult<Json<Movie>> {
    let imdb_id = require_imdb_id(&imdb_id)?;
    let movie = state
        .movies
        .find_by_imdb_id(imdb_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Movie", imdb_id)))?;
    Ok(Json(movie))
}

/// POST /addmovie
pub async fn add_movie(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<CreateMovie>,
) -> AppResult<(StatusCode, Json<InsertResult>)> {
    let inserted_id = state.movies.insert(&input).await?;
    tracing::info!(
        imdb_id = %input.imdb_id,
        id = inserted_id,
        user_id = %user.user_id,
        "Movie added",
    );
    Ok((StatusCode::CREATED, Json(InsertResult { inserted_id })))
}

/// PUT|PATCH /movie/{imdb_id}/review
///
/// Classifies the review into the sentiment vocabulary and stores both.
pub async fn update_review(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(imdb_id): Path<String>,
    ValidJson(input): ValidJson<UpdateReviewRequest>,
) -> AppResult<Json<UpdateReviewResponse>> {
    let imdb_id = require_imdb_id(&imdb_id)?;
    let ranked = state.ranking.rank_review(imdb_id, &input.admin_review).await?;

    tracing::info!(
        imdb_id,
        user_id = %admin.user_id,
        label = %ranked.label_name,
        rank = ranked.rank,
        "Admin review updated",
    );

    Ok(Json(UpdateReviewResponse {
        ranking_name: ranked.label_name,
        admin_review: input.admin_review,
    }))
}

/// GET /recommendedmovies
///
/// Movies sharing a genre with the caller's favourites, best rank first.
pub async fn recommended_movies(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Movie>>> {
    let account = state
        .users
        .find_by_user_id(&user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", &user.user_id)))?;

    let genre_names: Vec<String> = account
        .favourite_genres
        .into_iter()
        .map(|g| g.genre_name)
        .collect();
    if genre_names.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let movies = state
        .movies
        .find_by_genres(&genre_names, state.config.recommended_movie_limit)
        .await?;
    Ok(Json(movies))
}

fn require_imdb_id(raw: &str) -> AppResult<&str> {
    let imdb_id = raw.trim();
    if imdb_id.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Movie id is required".into(),
        )));
    }
    Ok(imdb_id)
}
