//! HTTP-level integration tests for registration, login, and token refresh.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use common::{
    body_json, post_json, register_and_login, registration, send, test_config, TestApp, PASSWORD,
};
use magicstream_api::auth::jwt::{validate_refresh_token, validate_token, TokenError};
use magicstream_core::types::{DbId, Timestamp};
use magicstream_db::models::user::{CreateUser, User};
use magicstream_db::repositories::memory::InMemoryUserRepo;
use magicstream_db::repositories::UserRepository;
use magicstream_db::RepoError;
use serde_json::json;

/// Reports every email as free, as a concurrent registration would see it
/// before the other request's insert lands.
struct StaleCountUsers(Arc<InMemoryUserRepo>);

#[async_trait]
impl UserRepository for StaleCountUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.0.find_by_email(email).await
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, RepoError> {
        self.0.find_by_user_id(user_id).await
    }

    async fn count_by_email(&self, _email: &str) -> Result<i64, RepoError> {
        Ok(0)
    }

    async fn insert(&self, input: &CreateUser) -> Result<DbId, RepoError> {
        self.0.insert(input).await
    }

    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
        updated_at: Timestamp,
    ) -> Result<bool, RepoError> {
        self.0
            .update_tokens(user_id, token, refresh_token, updated_at)
            .await
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_returns_201_with_inserted_id() {
    let app = TestApp::new();

    let response = post_json(app.app(), "/register", registration("a@x.com", "USER")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["inserted_id"].is_number());
}

#[tokio::test]
async fn duplicate_email_is_conflict_and_inserts_nothing() {
    let app = TestApp::new();
    let first = post_json(app.app(), "/register", registration("a@x.com", "USER")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app.app(), "/register", registration("a@x.com", "ADMIN")).await;

    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(app.users.count_by_email("a@x.com").await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_email_missed_by_the_count_is_still_conflict() {
    let app = TestApp::with_user_repo(test_config(), |users| {
        Arc::new(StaleCountUsers(users)) as Arc<dyn UserRepository>
    });
    let first = post_json(app.app(), "/register", registration("a@x.com", "USER")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app.app(), "/register", registration("a@x.com", "USER")).await;

    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(app.users.count_by_email("a@x.com").await.unwrap(), 1);
}

#[tokio::test]
async fn registration_stores_a_hash_not_the_password() {
    let app = TestApp::new();
    post_json(app.app(), "/register", registration("a@x.com", "USER")).await;

    let user = app.users.find_by_email("a@x.com").await.unwrap().unwrap();

    assert_ne!(user.password_hash, PASSWORD);
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert!(!user.user_id.is_empty());
    assert!(user.token.is_none());
}

#[tokio::test]
async fn role_defaults_to_user() {
    let app = TestApp::new();
    let mut body = registration("a@x.com", "USER");
    body.as_object_mut().unwrap().remove("role");

    let response = post_json(app.app(), "/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let user = app.users.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(user.role, "USER");
}

#[tokio::test]
async fn invalid_registration_lists_every_failed_field() {
    let app = TestApp::new();
    let body = json!({
        "first_name": "A",
        "last_name": "Lovelace",
        "email": "not-an-email",
        "password": "123",
        "role": "SUPERUSER",
        "favourite_genres": [{ "genre_id": 0, "genre_name": "Action" }],
    });

    let response = post_json(app.app(), "/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec![
            "email",
            "favourite_genres[0].genre_id",
            "first_name",
            "password",
            "role",
        ]
    );
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = TestApp::new();
    let request = Request::post("/register")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();

    let response = send(app.app(), request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_returns_profile_and_independently_valid_tokens() {
    let app = TestApp::new();

    let json = register_and_login(&app, "a@x.com", "USER").await;

    assert_eq!(json["email"], "a@x.com");
    assert_eq!(json["first_name"], "Ada");
    assert_eq!(json["last_name"], "Lovelace");
    assert_eq!(json["role"], "USER");
    assert_eq!(json["favourite_genres"][0]["genre_name"], "Action");
    assert!(json.get("password_hash").is_none());

    let token = json["token"].as_str().unwrap();
    let refresh = json["refresh_token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert!(!refresh.is_empty());

    let access_claims = validate_token(token, &app.config.jwt).unwrap();
    assert_eq!(access_claims.identity.email, "a@x.com");
    assert_eq!(access_claims.identity.user_id, json["user_id"].as_str().unwrap());

    let refresh_claims = validate_refresh_token(refresh, &app.config.jwt).unwrap();
    assert_eq!(refresh_claims.identity, access_claims.identity);
    assert!(refresh_claims.exp > access_claims.exp);
}

#[tokio::test]
async fn login_records_the_issued_pair() {
    let app = TestApp::new();
    let json = register_and_login(&app, "a@x.com", "USER").await;

    let user = app.users.find_by_email("a@x.com").await.unwrap().unwrap();

    assert_eq!(user.token.as_deref(), json["token"].as_str());
    assert_eq!(user.refresh_token.as_deref(), json["refresh_token"].as_str());
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let app = TestApp::new();
    register_and_login(&app, "a@x.com", "USER").await;

    let wrong_password = post_json(
        app.app(),
        "/login",
        json!({ "email": "a@x.com", "password": "not-the-password" }),
    )
    .await;
    let unknown_email = post_json(
        app.app(),
        "/login",
        json!({ "email": "nobody@x.com", "password": PASSWORD }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong_password).await, body_json(unknown_email).await);
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_issues_a_new_valid_pair() {
    let app = TestApp::new();
    let login = register_and_login(&app, "a@x.com", "USER").await;

    let response = post_json(
        app.app(),
        "/refresh",
        json!({ "refresh_token": login["refresh_token"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let claims = validate_token(json["token"].as_str().unwrap(), &app.config.jwt).unwrap();
    assert_eq!(claims.identity.email, "a@x.com");
    assert!(validate_refresh_token(json["refresh_token"].as_str().unwrap(), &app.config.jwt).is_ok());
}

#[tokio::test]
async fn access_token_cannot_be_used_to_refresh() {
    let app = TestApp::new();
    let login = register_and_login(&app, "a@x.com", "USER").await;

    let response = post_json(app.app(), "/refresh", json!({ "refresh_token": login["token"] })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_is_not_an_access_token() {
    let app = TestApp::new();
    let login = register_and_login(&app, "a@x.com", "USER").await;

    let err = validate_token(login["refresh_token"].as_str().unwrap(), &app.config.jwt).unwrap_err();

    assert!(matches!(err, TokenError::InvalidSignature));
}

#[tokio::test]
async fn garbage_refresh_token_is_unauthorized() {
    let app = TestApp::new();

    let response = post_json(app.app(), "/refresh", json!({ "refresh_token": "abc.def.ghi" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}
