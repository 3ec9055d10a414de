use std::time::Duration;

use axum::http::HeaderValue;
use magicstream_core::ranking::UnrankedPolicy;
use magicstream_pipeline::classifier::{
    ClassifierConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT,
};

use crate::auth::jwt::JwtConfig;

/// A required variable is absent or a value does not parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Server configuration loaded from environment variables.
///
/// Secrets and the classifier credential are required; everything else has a
/// default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Postgres connection string.
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Per-repository-operation timeout in seconds (default: `10`).
    pub db_timeout_secs: u64,
    /// Token signing secrets.
    pub jwt: JwtConfig,
    /// Classification service connection.
    pub classifier: ClassifierConfig,
    /// Prompt template with a `{rankings}` placeholder. Checked lazily on first ranking.
    pub prompt_template: Option<String>,
    /// What to store when the classifier answers outside the vocabulary.
    pub unranked_policy: UnrankedPolicy,
    /// Max movies returned by `/recommendedmovies` (default: `5`).
    pub recommended_movie_limit: i64,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Required | Default                     |
    /// |---------------------------|----------|-----------------------------|
    /// | `DATABASE_URL`            | **yes**  | --                          |
    /// | `SECRET_KEY`              | **yes**  | --                          |
    /// | `SECRET_REFRESH_KEY`      | **yes**  | --                          |
    /// | `OPENAI_API_KEY`          | **yes**  | --                          |
    /// | `HOST`                    | no       | `0.0.0.0`                   |
    /// | `PORT`                    | no       | `8080`                      |
    /// | `CORS_ORIGINS`            | no       | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`    | no       | `30`                        |
    /// | `DB_TIMEOUT_SECS`         | no       | `10`                        |
    /// | `OPENAI_BASE_URL`         | no       | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`            | no       | `gpt-4o-mini`               |
    /// | `CLASSIFIER_TIMEOUT_SECS` | no       | `30`                        |
    /// | `BASE_PROMPT_TEMPLATE`    | no       | --                          |
    /// | `UNRANKED_POLICY`         | no       | `pass_through`              |
    /// | `RECOMMENDED_MOVIE_LIMIT` | no       | `5`                         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&get, "PORT", 8080)?;
        let database_url = required("DATABASE_URL")?;

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::Invalid {
                var: "CORS_ORIGINS",
                reason: format!("'{bad}' is not a valid header value"),
            });
        }

        let request_timeout_secs: u64 = parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?;
        let db_timeout_secs: u64 = parse_or(&get, "DB_TIMEOUT_SECS", 10)?;

        let access_secret = required("SECRET_KEY")?;
        let refresh_secret = required("SECRET_REFRESH_KEY")?;
        if access_secret == refresh_secret {
            return Err(ConfigError::Invalid {
                var: "SECRET_REFRESH_KEY",
                reason: "must differ from SECRET_KEY".into(),
            });
        }

        let classifier_timeout_secs: u64 = parse_or(
            &get,
            "CLASSIFIER_TIMEOUT_SECS",
            DEFAULT_TIMEOUT.as_secs(),
        )?;
        let classifier = ClassifierConfig {
            api_key: required("OPENAI_API_KEY")?,
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            timeout: Duration::from_secs(classifier_timeout_secs),
        };

        let unranked_policy = match get("UNRANKED_POLICY") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                var: "UNRANKED_POLICY",
                reason: format!("{e}"),
            })?,
            None => UnrankedPolicy::default(),
        };

        let recommended_movie_limit: i64 = parse_or(&get, "RECOMMENDED_MOVIE_LIMIT", 5)?;
        if recommended_movie_limit < 1 {
            return Err(ConfigError::Invalid {
                var: "RECOMMENDED_MOVIE_LIMIT",
                reason: format!("must be at least 1, got {recommended_movie_limit}"),
            });
        }

        Ok(Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            db_timeout_secs,
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
            },
            classifier,
            prompt_template: get("BASE_PROMPT_TEMPLATE"),
            unranked_policy,
            recommended_movie_limit,
        })
    }

    pub fn db_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout_secs)
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
