//! Thin PDF text extraction using lopdf and pdf-extract.
//!
//! The extraction core only consumes a flat text stream; this module exists
//! to pull embedded text out of text-based PDFs. Image-only scans must be
//! run through an external OCR step first and supplied as `.txt`.

use lopdf::Document;
use tracing::debug;

use crate::error::PdfError;

/// Minimum embedded-text length to treat a PDF as text-based rather than a
/// bare scan.
const MIN_TEXT_LENGTH: usize = 50;

/// Extract the embedded page text of a PDF, pages concatenated in document
/// order with a blank-line separator.
pub fn extract_text(data: &[u8]) -> Result<String, PdfError> {
    let doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

    if doc.is_encrypted() {
        return Err(PdfError::Encrypted);
    }

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(PdfError::NoPages);
    }

    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

    debug!(
        pages = pages.len(),
        chars = text.len(),
        "extracted embedded PDF text"
    );

    if text.trim().len() < MIN_TEXT_LENGTH {
        return Err(PdfError::NoEmbeddedText);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail_parse() {
        let result = extract_text(b"not a pdf at all");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }
}
