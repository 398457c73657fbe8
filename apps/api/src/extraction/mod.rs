//! Text Extractor — PDF bytes to lowercase plain text.
//!
//! Tries the PDF text layer first and falls back to OCR when that yields only
//! whitespace. Every failure degrades to an empty string; callers never see an error.

pub mod ocr;

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, info, warn};

pub use ocr::OcrConfig;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("OCR tools unavailable: {0}")]
    OcrUnavailable(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    ocr: Option<OcrConfig>,
}

impl PdfTextExtractor {
    pub fn new(ocr: Option<OcrConfig>) -> Self {
        Self { ocr }
    }

    /// Extracts lowercase text, or returns an empty string if nothing could be recovered.
    pub fn extract(&self, bytes: &[u8]) -> String {
        let text = match extract_text_layer(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("{e}; trying OCR fallback");
                String::new()
            }
        };

        if !is_blank(&text) {
            debug!("Text layer yielded {} chars", text.len());
            return normalize(&text);
        }

        let Some(config) = &self.ocr else {
            info!("PDF has no text layer and OCR is disabled");
            return String::new();
        };

        match ocr::recognize(bytes, config) {
            Ok(text) => {
                info!("OCR recovered {} chars", text.len());
                normalize(&text)
            }
            Err(e) => {
                warn!("{e}; returning empty text");
                String::new()
            }
        }
    }
}

/// Reads the embedded text layer. Pages are returned in document order.
fn extract_text_layer(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| ExtractionError::Pdf("parser panicked on malformed input".to_string()))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
}
