//! PDF text extraction backed by `lopdf`.
//!
//! The extractor treats the upload as an opaque paginated document: pages are
//! read in page order and their visible text is joined with a single newline.
//! Parse failures propagate as [`ExtractionError`] so the HTTP layer can turn
//! them into a structured response instead of a blind 500.

use lopdf::Document;
use thiserror::Error;

/// Errors raised while turning uploaded bytes into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The bytes could not be parsed as a PDF document.
    #[error("failed to parse PDF document: {0}")]
    InvalidDocument(#[from] lopdf::Error),
    /// A page was present but its text could not be decoded.
    #[error("failed to extract text from page {page}: {source}")]
    PageText {
        /// One-based page number that failed.
        page: u32,
        /// Underlying parser error.
        #[source]
        source: lopdf::Error,
    },
}

/// Extract the visible text of every page, joined with a single newline.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = Document::load_mem(bytes)?;
    let mut pages = Vec::new();
    // get_pages is keyed by page number, so iteration preserves page order.
    for page_number in document.get_pages().keys() {
        let text = document
            .extract_text(&[*page_number])
            .map_err(|source| ExtractionError::PageText {
                page: *page_number,
                source,
            })?;
        pages.push(text);
    }
    Ok(pages.join("\n"))
}


#[cfg(test)]
mod tests {
    use super::test_support::pdf_with_text;
    use super::*;

    #[test]
    fn extracts_text_from_generated_pdf() {
        let bytes = pdf_with_text("Hello agreement");
        let text = extract_text(&bytes).expect("extraction");
        assert!(text.contains("Hello agreement"));
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let error = extract_text(b"definitely not a pdf").expect_err("parse failure");
        assert!(matches!(error, ExtractionError::InvalidDocument(_)));
    }
}
