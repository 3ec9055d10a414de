//! Route definitions for movies.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::movie;
use crate::state::AppState;

/// ```text
/// GET        /movies                    -> list_movies
/// GET        /movie/{imdb_id}           -> get_movie
/// POST       /addmovie                  -> add_movie
/// PUT|PATCH  /movie/{imdb_id}/review    -> update_review
/// GET        /recommendedmovies         -> recommended_movies
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(movie::list_movies))
        .route("/movie/{imdb_id}", get(movie::get_movie))
        .route("/addmovie", post(movie::add_movie))
        .route(
            "/movie/{imdb_id}/review",
            put(movie::update_review).patch(movie::update_review),
        )
        .route("/recommendedmovies", get(movie::recommended_movies))
}
