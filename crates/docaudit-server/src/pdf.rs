//! PDF text extraction
//!
//! Extracts embedded text page by page. Scanned (image-only) PDFs yield
//! empty text; the upload handler rejects those.

use thiserror::Error;

/// Errors that can occur during PDF text extraction
#[derive(Error, Debug)]
pub enum PdfError {
    /// The bytes could not be parsed as a PDF document
    #[error("failed to load PDF: {0}")]
    Load(String),
}

/// Extract the text of every page, newline-joined
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| PdfError::Load(e.to_string()))?;

    let mut text = String::new();
    for (page_num, _) in doc.get_pages() {
        if let Ok(page_text) = doc.extract_text(&[page_num]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }

    Ok(text)
}
