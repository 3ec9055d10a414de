pub mod auth;
pub mod genre;
pub mod movie;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree. All paths are mounted at the root.
///
/// ```text
/// GET        /movies                     list (public)
/// GET        /movie/{imdb_id}            get (requires auth)
/// POST       /addmovie                   create (requires auth)
/// PUT|PATCH  /movie/{imdb_id}/review     rank admin review (admin only)
/// GET        /recommendedmovies          by favourite genres (requires auth)
///
/// POST       /register                   register (public)
/// POST       /login                      login (public)
/// POST       /refresh                    refresh (public)
///
/// GET        /genres                     list (public)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(movie::router())
        .merge(auth::router())
        .merge(genre::router())
}
