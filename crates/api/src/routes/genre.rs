use axum::routing::get;
use axum::Router;

use crate::handlers::genre;
use crate::state::AppState;

/// `GET /genres -> list_genres`
pub fn router() -> Router<AppState> {
    Router::new().route("/genres", get(genre::list_genres))
}
