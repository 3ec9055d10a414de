#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use magicstream_api::config::ServerConfig;
use magicstream_api::router::build_app_router;
use magicstream_api::state::AppState;
use magicstream_db::models::genre::Genre;
use magicstream_db::models::movie::Movie;
use magicstream_db::models::ranking::Ranking;
use magicstream_db::repositories::memory::{
    InMemoryGenreRepo, InMemoryMovieRepo, InMemorySentimentRepo, InMemoryUserRepo,
};
use magicstream_db::repositories::UserRepository;
use magicstream_pipeline::{Classifier, ClassifierError, RankingPipeline};

pub const PROMPT_TEMPLATE: &str = "Classify this review as one of {rankings}. Review: ";
pub const PASSWORD: &str = "hunter22";

/// Environment used by every test app unless overridden.
pub fn test_env() -> HashMap<&'static str, String> {
    HashMap::from([
        ("DATABASE_URL", "postgres://unused".to_string()),
        ("SECRET_KEY", "test-access-secret".to_string()),
        ("SECRET_REFRESH_KEY", "test-refresh-secret".to_string()),
        ("OPENAI_API_KEY", "sk-test".to_string()),
        ("BASE_PROMPT_TEMPLATE", PROMPT_TEMPLATE.to_string()),
    ])
}

pub fn config_from(env: &HashMap<&'static str, String>) -> ServerConfig {
    ServerConfig::from_lookup(|key| env.get(key).cloned()).expect("test config should load")
}

/// Build a test `ServerConfig` with the default test environment.
pub fn test_config() -> ServerConfig {
    config_from(&test_env())
}

/// Classifier double that returns a fixed answer and records every prompt.
pub struct FakeClassifier {
    answer: Mutex<Result<String, u16>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeClassifier {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Mutex::new(Ok(answer.to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_answer(&self, answer: &str) {
        *self.answer.lock().unwrap() = Ok(answer.to_string());
    }

    pub fn fail_with(&self, status: u16) {
        *self.answer.lock().unwrap() = Err(status);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for FakeClassifier {
    fn is_configured(&self) -> bool {
        true
    }

    async fn classify(&self, prompt: &str) -> Result<String, ClassifierError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &*self.answer.lock().unwrap() {
            Ok(answer) => Ok(answer.clone()),
            Err(status) => Err(ClassifierError::ApiError {
                status: *status,
                body: "upstream failure".into(),
            }),
        }
    }
}

pub fn genre(genre_id: i32, genre_name: &str) -> Genre {
    Genre {
        genre_id,
        genre_name: genre_name.to_string(),
    }
}

/// The seeded vocabulary, sentinel included.
pub fn vocabulary() -> Vec<Ranking> {
    vec![
        Ranking::new("Excellent", 1),
        Ranking::new("Good", 2),
        Ranking::new("Okay", 3),
        Ranking::new("Bad", 4),
        Ranking::new("Terrible", 5),
        Ranking::new("Not_Ranked", 999),
    ]
}

pub fn all_genres() -> Vec<Genre> {
    vec![
        genre(1, "Comedy"),
        genre(2, "Drama"),
        genre(4, "Fantasy"),
        genre(6, "Sci-Fi"),
        genre(7, "Action"),
        genre(9, "Crime"),
    ]
}

fn movie(id: i64, imdb_id: &str, title: &str, genres: Vec<Genre>, ranking: Ranking) -> Movie {
    Movie {
        id,
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        poster_path: format!("https://img.example.com/{imdb_id}.jpg"),
        youtube_id: format!("yt-{imdb_id}"),
        genre: genres,
        admin_review: String::new(),
        ranking,
    }
}

/// Three catalog entries: two ranked, one still unranked.
pub fn seed_movies() -> Vec<Movie> {
    vec![
        movie(
            1,
            "tt0110912",
            "Pulp Fiction",
            vec![genre(9, "Crime"), genre(2, "Drama")],
            Ranking::new("Good", 2),
        ),
        movie(
            2,
            "tt0133093",
            "The Matrix",
            vec![genre(6, "Sci-Fi"), genre(7, "Action")],
            Ranking::new("Excellent", 1),
        ),
        movie(
            3,
            "tt0120737",
            "The Fellowship of the Ring",
            vec![genre(4, "Fantasy"), genre(7, "Action")],
            Ranking::new("Not_Ranked", 999),
        ),
    ]
}

/// A router over in-memory repositories, with handles for assertions.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub movies: Arc<InMemoryMovieRepo>,
    pub users: Arc<InMemoryUserRepo>,
    pub classifier: Arc<FakeClassifier>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self::with_user_repo(config, |users| users as Arc<dyn UserRepository>)
    }

    /// Like [`TestApp::with_config`], but the handlers see the repository
    /// returned by `wrap` instead of the in-memory store it is given.
    pub fn with_user_repo<F>(config: ServerConfig, wrap: F) -> Self
    where
        F: FnOnce(Arc<InMemoryUserRepo>) -> Arc<dyn UserRepository>,
    {
        let movies = Arc::new(InMemoryMovieRepo::with_movies(seed_movies()));
        let users = Arc::new(InMemoryUserRepo::new());
        let classifier = Arc::new(FakeClassifier::answering("Excellent"));

        let ranking = RankingPipeline::new(
            Arc::new(InMemorySentimentRepo::new(vocabulary())),
            movies.clone(),
            classifier.clone(),
            config.prompt_template.clone(),
            config.unranked_policy,
        );

        let state = AppState {
            config: Arc::new(config.clone()),
            movies: movies.clone(),
            users: wrap(users.clone()),
            genres: Arc::new(InMemoryGenreRepo::new(all_genres())),
            ranking: Arc::new(ranking),
        };

        Self {
            router: build_app_router(state, &config),
            config,
            movies,
            users,
            classifier,
        }
    }

    /// A fresh handle to the router (each `oneshot` consumes one).
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send_json(app, Method::POST, uri, body, None).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send_json(app, Method::POST, uri, body, Some(token)).await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

pub fn registration(email: &str, role: &str) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "password": PASSWORD,
        "role": role,
        "favourite_genres": [{ "genre_id": 7, "genre_name": "Action" }],
    })
}

/// Register through the API and return the login response body.
pub async fn register_and_login(app: &TestApp, email: &str, role: &str) -> Value {
    let response = post_json(app.app(), "/register", registration(email, role)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        app.app(),
        "/login",
        json!({ "email": email, "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Access token for a freshly registered user with `role`.
pub async fn token_for(app: &TestApp, email: &str, role: &str) -> String {
    let login = register_and_login(app, email, role).await;
    login["token"].as_str().unwrap().to_string()
}
