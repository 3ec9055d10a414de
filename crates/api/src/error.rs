use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use magicstream_core::error::CoreError;
use magicstream_db::RepoError;
use magicstream_pipeline::RankingError;
use serde_json::json;

use crate::auth::password::HashingFailure;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`RepoError`] for storage errors,
/// and adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `magicstream_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A repository error.
    #[error(transparent)]
    Repo(#[from] RepoError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<RankingError> for AppError {
    fn from(err: RankingError) -> Self {
        let core = match err {
            RankingError::NotFound(imdb_id) => CoreError::not_found("Movie", imdb_id),
            RankingError::ConfigurationMissing(what) => CoreError::ConfigurationMissing(what),
            RankingError::VocabularyUnavailable(repo) => {
                CoreError::Unavailable(format!("sentiment vocabulary: {repo}"))
            }
            RankingError::ClassificationFailure(e) => {
                CoreError::Unavailable(format!("classifier: {e}"))
            }
            RankingError::UnrecognizedLabel(label) => {
                CoreError::Internal(format!("classifier returned unrecognized label '{label}'"))
            }
            RankingError::Persistence(repo) => return AppError::Repo(repo),
        };
        AppError::Core(core)
    }
}

impl From<HashingFailure> for AppError {
    fn from(err: HashingFailure) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidFields(fields) => {
                    details = Some(fields.clone());
                    (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        "Request validation failed".to_string(),
                    )
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Unavailable(msg) => {
                    tracing::error!(error = %msg, "Dependency unavailable");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "DEPENDENCY_UNAVAILABLE",
                        "A required service is unavailable".to_string(),
                    )
                }
                CoreError::ConfigurationMissing(msg) => {
                    tracing::error!(error = %msg, "Configuration missing");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIGURATION_MISSING",
                        "The server is not fully configured".to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Repository errors ---
            AppError::Repo(err) => classify_repo_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a repository error into an HTTP status, error code, and message.
///
/// - Unique constraint violations map to 409.
/// - Timeouts and connection failures map to 500 `DEPENDENCY_UNAVAILABLE`.
/// - Everything else maps to 500 with a sanitized message.
fn classify_repo_error(err: &RepoError) -> (StatusCode, &'static str, String) {
    match err {
        RepoError::Conflict(constraint) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        other if other.is_unavailable() => {
            tracing::error!(error = %other, "Database unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DEPENDENCY_UNAVAILABLE",
                "A required service is unavailable".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

