//! Best-effort PDF-to-text extraction.
//!
//! The PDF library sits behind [`PdfBackend`] so either `lopdf` (per page) or `pdf-extract`
//! (whole document) can be selected at startup. [`TextExtractor::extract`] never fails: any
//! parse error, including a panic inside the library, becomes an empty [`Extraction`] that
//! carries the error for the caller to display.

mod backends;

pub use backends::{LopdfBackend, PdfExtractBackend};

use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Errors raised while reading a PDF.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No bytes were supplied.
    #[error("the uploaded file is empty")]
    EmptyInput,
    /// The PDF library rejected the document.
    #[error("failed to parse PDF: {0}")]
    Parse(String),
    /// The PDF library panicked on malformed input.
    #[error("PDF parser crashed on malformed input")]
    Panicked,
}

/// Library used to turn PDF bytes into text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PdfBackendKind {
    /// `lopdf`, one extraction call per page.
    #[default]
    Lopdf,
    /// `pdf-extract`, a single pass over the whole document.
    PdfExtract,
}

impl std::str::FromStr for PdfBackendKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lopdf" => Ok(Self::Lopdf),
            "pdf-extract" | "pdf_extract" | "pdfextract" => Ok(Self::PdfExtract),
            _ => Err(()),
        }
    }
}

/// Interface implemented by PDF libraries.
pub trait PdfBackend {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Return the text of each page in document order. Pages without extractable text yield
    /// an empty string rather than an error.
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Result of a single extraction attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Concatenated page text, empty on failure.
    pub text: String,
    /// Number of text segments reported by the backend (pages for `lopdf`).
    pub pages: usize,
    /// Why extraction failed, when it did.
    pub error: Option<ExtractionError>,
}

impl Extraction {
    fn failed(error: ExtractionError) -> Self {
        Self {
            text: String::new(),
            pages: 0,
            error: Some(error),
        }
    }

    /// True when there is nothing to summarize or query.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of characters in the extracted text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Extracts plain text from uploaded PDF bytes using the configured backend.
pub struct TextExtractor {
    backend: Box<dyn PdfBackend + Send + Sync>,
}

impl TextExtractor {
    /// Wrap an explicit backend.
    pub fn new(backend: Box<dyn PdfBackend + Send + Sync>) -> Self {
        Self { backend }
    }

    /// Build an extractor for the selected backend kind.
    pub fn for_kind(kind: PdfBackendKind) -> Self {
        match kind {
            PdfBackendKind::Lopdf => Self::new(Box::new(LopdfBackend)),
            PdfBackendKind::PdfExtract => Self::new(Box::new(PdfExtractBackend)),
        }
    }

    /// Name of the wrapped backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Extract the text of `bytes`, concatenating pages with no separator.
    pub fn extract(&self, bytes: &[u8]) -> Extraction {
        if bytes.is_empty() {
            return Extraction::failed(ExtractionError::EmptyInput);
        }

        let backend = self.backend.as_ref();
        let result = panic::catch_unwind(AssertUnwindSafe(|| backend.page_texts(bytes)))
            .unwrap_or(Err(ExtractionError::Panicked));

        match result {
            Ok(pages) => {
                let extraction = Extraction {
                    text: pages.concat(),
                    pages: pages.len(),
                    error: None,
                };
                tracing::debug!(
                    backend = backend.name(),
                    pages = extraction.pages,
                    characters = extraction.char_count(),
                    "Extracted PDF text"
                );
                extraction
            }
            Err(error) => {
                tracing::warn!(backend = backend.name(), %error, "PDF extraction failed");
                Extraction::failed(error)
            }
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::for_kind(PdfBackendKind::default())
    }
}

// Shared with the integration tests, which cannot see `cfg(test)` items of the library.
#[cfg(test)]
#[path = "../../tests/common/mod.rs"]
pub(crate) mod fixtures;
