//! Summarize and answer-question operations over extracted document text.
//!
//! Both operations issue exactly one completion request and never raise: a provider failure
//! becomes [`Completion::Failed`] carrying the operation's fallback text and a message the
//! presentation layer can show. Blank questions are rejected before any request is made.

use crate::inference::{
    CompletionClient, InferenceError,
    prompt::{question_messages, summary_messages},
};
use crate::metrics::AssistantMetrics;
use std::sync::Arc;
use thiserror::Error;

/// Value returned by [`DocumentAssistant::summarize`] when the provider call fails.
pub const SUMMARY_FALLBACK: &str = "";
/// Value returned by [`DocumentAssistant::answer_question`] when the provider call fails.
pub const ANSWER_FALLBACK: &str = "Sorry, I couldn't answer.";

/// Input rejected before reaching the provider.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AssistantError {
    /// Question was empty or whitespace only.
    #[error("Please enter a question.")]
    BlankQuestion,
}

/// Outcome of a single completion-backed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Reply text from the model, treated as opaque.
    Reply {
        /// Model output.
        text: String,
    },
    /// Provider call failed.
    Failed {
        /// Text to display in place of a reply.
        fallback: String,
        /// Human-readable description of the failure.
        message: String,
    },
}

impl Completion {
    /// Text to display: the reply, or the operation's fallback.
    pub fn text(&self) -> &str {
        match self {
            Self::Reply { text } => text,
            Self::Failed { fallback, .. } => fallback,
        }
    }

    /// Failure message, if the call failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Reply { .. } => None,
            Self::Failed { message, .. } => Some(message),
        }
    }

    /// True when the provider produced a reply.
    pub fn is_reply(&self) -> bool {
        matches!(self, Self::Reply { .. })
    }
}

/// Runs document tasks against a completion provider.
#[derive(Clone)]
pub struct DocumentAssistant {
    client: Arc<dyn CompletionClient>,
    metrics: Arc<AssistantMetrics>,
}

impl DocumentAssistant {
    /// Build an assistant around `client`, recording into `metrics`.
    pub fn new(client: Arc<dyn CompletionClient>, metrics: Arc<AssistantMetrics>) -> Self {
        Self { client, metrics }
    }

    /// Request a five-bullet summary of `document`.
    ///
    /// The caller is expected to pass non-empty text; an empty document is still sent.
    pub async fn summarize(&self, document: &str) -> Completion {
        let result = self.client.complete(summary_messages(document)).await;
        match result {
            Ok(text) => {
                self.metrics.record_summary();
                tracing::info!(characters = text.chars().count(), "Summary generated");
                Completion::Reply { text }
            }
            Err(error) => self.failed("Error while summarizing", SUMMARY_FALLBACK, error),
        }
    }

    /// Answer `question` using only `document`.
    pub async fn answer_question(
        &self,
        document: &str,
        question: &str,
    ) -> Result<Completion, AssistantError> {
        if question.trim().is_empty() {
            return Err(AssistantError::BlankQuestion);
        }

        let result = self
            .client
            .complete(question_messages(document, question))
            .await;
        Ok(match result {
            Ok(text) => {
                self.metrics.record_answer();
                tracing::info!(characters = text.chars().count(), "Question answered");
                Completion::Reply { text }
            }
            Err(error) => self.failed("Error answering the question", ANSWER_FALLBACK, error),
        })
    }

    fn failed(&self, context: &str, fallback: &str, error: InferenceError) -> Completion {
        self.metrics.record_inference_failure();
        tracing::warn!(%error, "{}", context);
        Completion::Failed {
            fallback: fallback.to_string(),
            message: format!("{context}: {error}"),
        }
    }
}
