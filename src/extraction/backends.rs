//! Concrete PDF libraries behind [`PdfBackend`].

use super::{ExtractionError, PdfBackend};
use lopdf::Document;

/// Per-page extraction through `lopdf`.
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let doc =
            Document::load_mem(bytes).map_err(|error| ExtractionError::Parse(error.to_string()))?;

        // `get_pages` is keyed by page number, so iteration follows document order.
        let pages = doc
            .get_pages()
            .into_keys()
            .map(|page_number| match doc.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(error) => {
                    tracing::debug!(page_number, %error, "Page has no extractable text");
                    String::new()
                }
            })
            .collect();

        Ok(pages)
    }
}

/// Whole-document extraction through `pdf-extract`.
///
/// The library reports the document as a single string, so this backend yields one segment.
pub struct PdfExtractBackend;

impl PdfBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|error| ExtractionError::Parse(error.to_string()))?;
        Ok(vec![text])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::TextExtractor;
    use crate::extraction::fixtures::pdf_with_pages;

    #[test]
    fn lopdf_reports_one_entry_per_page() {
        let bytes = pdf_with_pages(&["One", "", "Three"]);
        let pages = LopdfBackend.page_texts(&bytes).expect("pages");

        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("One"));
        assert!(pages[1].trim().is_empty());
        assert!(pages[2].contains("Three"));
    }

    #[test]
    fn lopdf_rejects_garbage() {
        let error = LopdfBackend
            .page_texts(b"<html>not a pdf</html>")
            .expect_err("garbage input");
        assert!(matches!(error, ExtractionError::Parse(_)));
    }

    #[test]
    fn pdf_extract_garbage_yields_empty_text_and_error() {
        let extraction = TextExtractor::new(Box::new(PdfExtractBackend)).extract(b"garbage");

        assert_eq!(extraction.text, "");
        assert!(extraction.error.is_some());
    }
}
