//! Handlers for registration, login, and token refresh.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use magicstream_core::error::CoreError;
use magicstream_core::roles::ROLE_USER;
use magicstream_core::validation::{not_blank, role_rule};
use magicstream_db::models::genre::Genre;
use magicstream_db::models::user::{CreateUser, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{issue_tokens, validate_refresh_token, Identity, TokenPair};
use crate::auth::password::{hash_password, verify_absent_account, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::response::InsertResult;
use crate::state::AppState;

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100))]
    pub first_name: String,
    #[validate(length(min = 2, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default = "default_role")]
    #[validate(custom(function = "role_rule"))]
    pub role: String,
    #[validate(nested)]
    pub favourite_genres: Vec<Genre>,
}

fn default_role() -> String {
    ROLE_USER.to_string()
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

/// Request body for `POST /refresh`.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(custom(function = "not_blank"))]
    pub refresh_token: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub token: String,
    pub refresh_token: String,
    pub favourite_genres: Vec<Genre>,
}

/// Successful refresh response.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /register
///
/// Creates an account. A duplicate email is a 409 whether it is caught by
/// the pre-insert count or, under a concurrent registration, by the unique
/// constraint on insert.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<InsertResult>)> {
    if state.users.count_by_email(&input.email).await? > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "User already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)?;

    let create = CreateUser {
        user_id: uuid::Uuid::new_v4().to_string(),
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        password_hash,
        role: input.role,
        favourite_genres: input.favourite_genres,
    };
    let inserted_id = state.users.insert(&create).await?;

    tracing::info!(user_id = %create.user_id, role = %create.role, "User registered");
    Ok((StatusCode::CREATED, Json(InsertResult { inserted_id })))
}

/// POST /login
///
/// Authenticate with email + password. Returns the profile and a fresh token pair.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    // 1. Find user by email. A miss still pays for one hash verification.
    let Some(user) = state.users.find_by_email(&input.email).await? else {
        verify_absent_account(&input.password)?;
        return Err(invalid_credentials());
    };

    // 2. Verify password.
    if !verify_password(&input.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.user_id, "Password mismatch");
        return Err(invalid_credentials());
    }

    // 3. Issue and record tokens.
    let tokens = issue_and_record(&state, &user).await?;

    tracing::info!(user_id = %user.user_id, "User logged in");
    Ok(Json(LoginResponse {
        user_id: user.user_id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        role: user.role,
        token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        favourite_genres: user.favourite_genres,
    }))
}

/// POST /refresh
///
/// Exchange a valid refresh token for a new access + refresh pair.
pub async fn refresh(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let claims = validate_refresh_token(&input.refresh_token, &state.config.jwt).map_err(|e| {
        tracing::debug!(error = %e, "Rejected refresh token");
        invalid_refresh_token()
    })?;

    // Re-read the account so the new tokens carry its current profile.
    let user = state
        .users
        .find_by_user_id(&claims.identity.user_id)
        .await?
        .ok_or_else(invalid_refresh_token)?;

    let tokens = issue_and_record(&state, &user).await?;

    Ok(Json(RefreshResponse {
        token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a token pair for `user` and store it as the most recently issued pair.
async fn issue_and_record(state: &AppState, user: &User) -> AppResult<TokenPair> {
    let identity = Identity {
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        role: user.role.clone(),
        user_id: user.user_id.clone(),
    };
    let tokens = issue_tokens(&identity, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let updated = state
        .users
        .update_tokens(
            &user.user_id,
            &tokens.access_token,
            &tokens.refresh_token,
            Utc::now(),
        )
        .await?;
    if !updated {
        tracing::warn!(user_id = %user.user_id, "Issued tokens for a user row that no longer exists");
    }

    Ok(tokens)
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()))
}

fn invalid_refresh_token() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid or expired refresh token".into(),
    ))
}
