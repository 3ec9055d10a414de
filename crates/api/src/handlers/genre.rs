//! Handlers for the `/genres` resource.

use axum::extract::State;
use axum::Json;
use magicstream_db::models::genre::Genre;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /genres
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.genres.list_all().await?;
    Ok(Json(genres))
}
