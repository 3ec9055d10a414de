//! Sentiment classifier contract and an OpenAI-compatible HTTP client.
//!
//! The pipeline only needs "prompt in, label text out"; [`OpenAiClassifier`]
//! implements that against any `/chat/completions` endpoint using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default base URL for the classification service.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for a single classification call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from a classification call.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The call did not finish within the configured timeout.
    #[error("Classification timed out after {0:?}")]
    Timeout(Duration),

    /// The service returned a non-2xx status code.
    #[error("Classification API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered without any message content.
    #[error("Classification response contained no choices")]
    EmptyResponse,
}

/// Classifies free text into one label.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Whether the credential needed to call the service is present.
    fn is_configured(&self) -> bool;

    /// Send the full prompt and return the raw answer text.
    async fn classify(&self, prompt: &str) -> Result<String, ClassifierError>;
}

/// Connection settings for [`OpenAiClassifier`].
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP classifier for OpenAI-compatible chat completion APIs.
pub struct OpenAiClassifier {
    client: reqwest::Client,
    config: ClassifierConfig,
}

impl OpenAiClassifier {
    /// Build a classifier with its own connection pool and request timeout.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClassifierError::Request)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn map_request_error(&self, err: reqwest::Error) -> ClassifierError {
        if err.is_timeout() {
            ClassifierError::Timeout(self.config.timeout)
        } else {
            ClassifierError::Request(err)
        }
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    fn is_configured(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    async fn classify(&self, prompt: &str) -> Result<String, ClassifierError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClassifierError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.map_request_error(e))?;
        first_answer(parsed)
    }
}

/// Pull the first choice's content out of a chat completion, trimmed of
/// surrounding whitespace.
fn first_answer(response: ChatResponse) -> Result<String, ClassifierError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .ok_or(ClassifierError::EmptyResponse)
}
