//! In-memory cache of extracted documents, one entry per upload.
//!
//! An entry keeps the extracted text so switching between summarizing and asking questions
//! never re-parses the PDF. Every upload gets its own entry; identical bytes share the
//! extracted text but nothing else. The store holds at most `capacity` entries and evicts the
//! oldest upload first.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Upper bound on cached uploads when none is configured.
pub const DEFAULT_MAX_DOCUMENTS: usize = 64;

/// A successfully extracted upload.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    /// Identifier handed back to the client.
    pub id: Uuid,
    /// File name supplied with the upload.
    pub file_name: String,
    /// Hex SHA-256 of the uploaded bytes.
    pub fingerprint: String,
    /// Extracted text, shared with other uploads of the same bytes.
    pub text: Arc<str>,
    /// Segments reported by the extractor.
    pub pages: usize,
    /// Upload time, RFC 3339.
    pub uploaded_at: String,
    /// Most recent successful summary, offered as a download.
    pub last_summary: Option<String>,
}

impl StoredDocument {
    /// Number of characters in the extracted text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Hex SHA-256 digest of `bytes`.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[derive(Default)]
struct Entries {
    documents: HashMap<Uuid, StoredDocument>,
    // Upload order, oldest first.
    order: VecDeque<Uuid>,
}

/// Shared, bounded map of uploads keyed by id.
#[derive(Clone)]
pub struct DocumentStore {
    entries: Arc<RwLock<Entries>>,
    capacity: usize,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_DOCUMENTS)
    }
}

impl DocumentStore {
    /// Create an empty store holding up to [`DEFAULT_MAX_DOCUMENTS`] uploads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store holding up to `capacity` uploads (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries::default())),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of uploads kept before the oldest is evicted.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store extracted text under a fresh id, evicting the oldest uploads beyond capacity.
    pub async fn insert(
        &self,
        file_name: String,
        fingerprint: String,
        text: Arc<str>,
        pages: usize,
    ) -> StoredDocument {
        let uploaded_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let document = StoredDocument {
            id: Uuid::new_v4(),
            file_name,
            fingerprint,
            text,
            pages,
            uploaded_at,
            last_summary: None,
        };

        let mut entries = self.entries.write().await;
        entries.documents.insert(document.id, document.clone());
        entries.order.push_back(document.id);
        while entries.documents.len() > self.capacity {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            if entries.documents.remove(&oldest).is_some() {
                tracing::info!(
                    document_id = %oldest,
                    capacity = self.capacity,
                    "Evicted oldest document"
                );
            }
        }
        drop(entries);

        tracing::debug!(document_id = %document.id, pages = document.pages, "Stored document");
        document
    }

    /// Text and page count already extracted from bytes with this fingerprint.
    pub async fn cached_text(&self, fingerprint: &str) -> Option<(Arc<str>, usize)> {
        self.entries
            .read()
            .await
            .documents
            .values()
            .find(|document| document.fingerprint == fingerprint)
            .map(|document| (document.text.clone(), document.pages))
    }

    /// Look up a document by id.
    pub async fn get(&self, id: Uuid) -> Option<StoredDocument> {
        self.entries.read().await.documents.get(&id).cloned()
    }

    /// Remember the latest summary for download. Returns false when the id is unknown.
    pub async fn record_summary(&self, id: Uuid, summary: String) -> bool {
        match self.entries.write().await.documents.get_mut(&id) {
            Some(document) => {
                document.last_summary = Some(summary);
                true
            }
            None => false,
        }
    }

    /// Forget a document. Returns false when the id is unknown.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut entries = self.entries.write().await;
        if entries.documents.remove(&id).is_none() {
            return false;
        }
        entries.order.retain(|queued| *queued != id);
        true
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.entries.read().await.documents.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.documents.is_empty()
    }
}
