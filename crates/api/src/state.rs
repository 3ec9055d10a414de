use std::sync::Arc;

use magicstream_db::repositories::{GenreRepository, MovieRepository, UserRepository};
use magicstream_pipeline::RankingPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Repositories are injected as trait objects: `main` wires the Postgres
/// implementations, tests wire the in-memory ones.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (secrets, limits).
    pub config: Arc<ServerConfig>,
    pub movies: Arc<dyn MovieRepository>,
    pub users: Arc<dyn UserRepository>,
    pub genres: Arc<dyn GenreRepository>,
    /// Review ranking pipeline, sharing the same movie repository.
    pub ranking: Arc<RankingPipeline>,
}
