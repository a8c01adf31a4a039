//! Chat-completion client and the prompts sent through it.

mod client;
pub mod prompt;

pub use client::{CompletionClient, HttpCompletionClient, TEMPERATURE};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Connection settings for the inference provider.
#[derive(Clone)]
pub struct InferenceSettings {
    /// Bearer credential; an empty key is sent as-is and rejected by the provider.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API, e.g. `https://api.groq.com/openai/v1`.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Upper bound on a single request.
    pub timeout: Duration,
}

impl std::fmt::Debug for InferenceSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed instruction framing the task.
    System,
    /// Content supplied on behalf of the user.
    User,
}

/// One `{role, content}` entry of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Failures of a single completion call. None of them are retried.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Connection could not be established or was interrupted.
    #[error("request to inference provider failed: {0}")]
    Transport(String),
    /// No response within the configured timeout.
    #[error("inference provider did not respond within {}s", .0.as_secs_f32())]
    Timeout(Duration),
    /// Provider answered with a non-2xx status.
    #[error("inference provider returned {status}: {body}")]
    Status {
        /// HTTP status code returned.
        status: StatusCode,
        /// Response body, capped for display.
        body: String,
    },
    /// Response body was not a chat-completion document.
    #[error("malformed inference response: {0}")]
    InvalidResponse(String),
    /// Response contained no choice with message content.
    #[error("inference response contained no reply")]
    EmptyChoices,
}
