//! Service coordinating extraction, the document cache, and the assistant.

use crate::{
    assistant::{AssistantError, Completion, DocumentAssistant},
    config::Config,
    documents::{DocumentStore, StoredDocument, fingerprint},
    extraction::{ExtractionError, TextExtractor},
    inference::{CompletionClient, HttpCompletionClient},
    metrics::{AssistantMetrics, MetricsSnapshot},
};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Message shown when an upload produced no text.
pub const UNREADABLE_PDF_WARNING: &str = "This PDF seems empty or could not be parsed.";

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Extraction yielded no text; `cause` is set when the parser failed.
    #[error("This PDF seems empty or could not be parsed.")]
    Unreadable {
        /// Parser failure, absent for genuinely textless documents.
        cause: Option<ExtractionError>,
    },
    /// No document with this id is cached.
    #[error("Document {0} not found; upload it again")]
    DocumentNotFound(Uuid),
    /// No summary has been generated for this document yet.
    #[error("No summary available for document {0}")]
    NoSummary(Uuid),
    /// Input rejected before reaching the provider.
    #[error(transparent)]
    Rejected(#[from] AssistantError),
    /// Extraction task could not be joined.
    #[error("Extraction task failed: {0}")]
    Internal(String),
}

/// Shared state behind the HTTP surface and the CLI.
///
/// Construct once near process start and share through an `Arc`.
pub struct AssistantService {
    extractor: Arc<TextExtractor>,
    documents: DocumentStore,
    assistant: DocumentAssistant,
    metrics: Arc<AssistantMetrics>,
}

impl AssistantService {
    /// Build the service from loaded configuration.
    pub fn new(config: &Config) -> Self {
        tracing::info!(
            pdf_backend = ?config.pdf_backend,
            model = %config.inference_model,
            max_documents = config.max_documents,
            "Initializing assistant service"
        );
        let client = HttpCompletionClient::new(config.inference_settings());
        Self::with_parts(TextExtractor::for_kind(config.pdf_backend), Arc::new(client))
            .with_max_documents(config.max_documents)
    }

    /// Build the service from explicit collaborators.
    pub fn with_parts(extractor: TextExtractor, client: Arc<dyn CompletionClient>) -> Self {
        let metrics = Arc::new(AssistantMetrics::new());
        Self {
            extractor: Arc::new(extractor),
            documents: DocumentStore::new(),
            assistant: DocumentAssistant::new(client, metrics.clone()),
            metrics,
        }
    }

    /// Bound the document cache; the oldest upload is evicted first.
    pub fn with_max_documents(mut self, max_documents: usize) -> Self {
        self.documents = DocumentStore::with_capacity(max_documents);
        self
    }

    /// Extract and cache an upload under a fresh id. Bytes seen before reuse the earlier
    /// extracted text instead of being parsed again.
    pub async fn upload(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<StoredDocument, ServiceError> {
        let digest = fingerprint(&bytes);
        let (text, pages) = match self.documents.cached_text(&digest).await {
            Some(cached) => {
                tracing::debug!(fingerprint = %digest, "Reusing extracted text");
                cached
            }
            None => self.extract(&file_name, bytes).await?,
        };

        let document = self
            .documents
            .insert(file_name, digest, text, pages)
            .await;
        tracing::info!(
            document_id = %document.id,
            file_name = %document.file_name,
            pages = document.pages,
            characters = document.char_count(),
            "Document uploaded"
        );
        Ok(document)
    }

    async fn extract(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(Arc<str>, usize), ServiceError> {
        let extractor = self.extractor.clone();
        let size = bytes.len();
        let extraction = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|error| ServiceError::Internal(error.to_string()))?;

        self.metrics.record_extraction(!extraction.is_empty());
        if extraction.is_empty() {
            tracing::warn!(
                %file_name,
                bytes = size,
                error = ?extraction.error,
                "Upload produced no text"
            );
            return Err(ServiceError::Unreadable {
                cause: extraction.error,
            });
        }
        Ok((Arc::from(extraction.text), extraction.pages))
    }

    /// Summarize a cached document and keep a successful result for download.
    pub async fn summarize(&self, id: Uuid) -> Result<Completion, ServiceError> {
        let document = self.document(id).await?;
        let completion = self.assistant.summarize(&document.text).await;
        if let Completion::Reply { text } = &completion {
            self.documents.record_summary(id, text.clone()).await;
        }
        Ok(completion)
    }

    /// Answer a question about a cached document.
    pub async fn ask(&self, id: Uuid, question: &str) -> Result<Completion, ServiceError> {
        let document = self.document(id).await?;
        Ok(self
            .assistant
            .answer_question(&document.text, question)
            .await?)
    }

    /// Most recent summary for a document, as plain text.
    pub async fn summary_text(&self, id: Uuid) -> Result<String, ServiceError> {
        self.document(id)
            .await?
            .last_summary
            .ok_or(ServiceError::NoSummary(id))
    }

    /// Look up a cached document.
    pub async fn document(&self, id: Uuid) -> Result<StoredDocument, ServiceError> {
        self.documents
            .get(id)
            .await
            .ok_or(ServiceError::DocumentNotFound(id))
    }

    /// Drop a cached document.
    pub async fn forget(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.documents.remove(id).await {
            tracing::info!(document_id = %id, "Document forgotten");
            Ok(())
        } else {
            Err(ServiceError::DocumentNotFound(id))
        }
    }

    /// Current counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
