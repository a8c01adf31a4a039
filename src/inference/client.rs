//! HTTP client for OpenAI-compatible chat-completion endpoints.

use super::{ChatMessage, InferenceError, InferenceSettings};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Sampling temperature used for every request.
pub const TEMPERATURE: f64 = 0.2;

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Interface implemented by chat-completion providers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `messages` in order and return the first choice's reply text.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, InferenceError>;
}

/// Single-attempt client for a hosted `/chat/completions` endpoint.
pub struct HttpCompletionClient {
    http: Client,
    settings: InferenceSettings,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl HttpCompletionClient {
    /// Build a client from explicit settings; the credential is never read from the environment.
    pub fn new(settings: InferenceSettings) -> Self {
        let http = Client::builder()
            .user_agent(concat!("pdf-assistant/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .expect("Failed to construct reqwest::Client for inference");
        Self { http, settings }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, InferenceError> {
        let payload = ChatCompletionRequest {
            model: &self.settings.model,
            messages: &messages,
            temperature: TEMPERATURE,
        };

        tracing::debug!(
            model = %self.settings.model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    InferenceError::Timeout(self.settings.timeout)
                } else {
                    InferenceError::Transport(error.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(InferenceError::Status { status, body });
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|error| {
            if error.is_timeout() {
                InferenceError::Timeout(self.settings.timeout)
            } else {
                InferenceError::InvalidResponse(error.to_string())
            }
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(InferenceError::EmptyChoices)
    }
}
