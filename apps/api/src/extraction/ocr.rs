//! OCR fallback for scanned PDFs: `pdftoppm` renders pages, `tesseract` reads them.

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use super::ExtractionError;

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Render resolution; higher is slower but reads small print better.
    pub dpi: u32,
    /// Tesseract language code.
    pub lang: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            lang: "eng".to_string(),
        }
    }
}

/// Checks that both external tools can be launched.
pub fn is_ocr_available() -> bool {
    let pdftoppm = Command::new("pdftoppm").arg("-v").output().is_ok();
    let tesseract = Command::new("tesseract").arg("--version").output().is_ok();

    if !pdftoppm {
        debug!("pdftoppm not found - install poppler-utils for OCR support");
    }
    if !tesseract {
        debug!("tesseract not found - install tesseract-ocr for OCR support");
    }

    pdftoppm && tesseract
}

/// Renders every page of `bytes` and runs OCR on each, concatenated in page order.
pub fn recognize(bytes: &[u8], config: &OcrConfig) -> Result<String, ExtractionError> {
    if !is_ocr_available() {
        return Err(ExtractionError::OcrUnavailable(
            "pdftoppm (poppler-utils) and tesseract-ocr must be installed".to_string(),
        ));
    }

    let temp_dir = tempfile::tempdir()?;
    let pdf_path = temp_dir.path().join("resume.pdf");
    fs::write(&pdf_path, bytes)?;

    let pages = render_pages(&pdf_path, temp_dir.path(), config.dpi)?;
    debug!("Rendered {} pages for OCR", pages.len());

    let mut text = String::new();
    for (i, page) in pages.iter().enumerate() {
        let page_text = read_page(page, &config.lang, i + 1)?;
        if !text.is_empty() && !page_text.is_empty() {
            text.push('\n');
        }
        text.push_str(&page_text);
    }
    Ok(text)
}

fn render_pages(
    pdf_path: &Path,
    out_dir: &Path,
    dpi: u32,
) -> Result<Vec<std::path::PathBuf>, ExtractionError> {
    let output = Command::new("pdftoppm")
        .arg("-png")
        .arg("-r")
        .arg(dpi.to_string())
        .arg(pdf_path)
        .arg(out_dir.join("page"))
        .output()
        .map_err(|e| ExtractionError::Ocr(format!("failed to run pdftoppm: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractionError::Ocr(format!("pdftoppm failed: {}", stderr.trim())));
    }

    // pdftoppm zero-pads page numbers, so lexical order is page order.
    let mut pages: Vec<_> = fs::read_dir(out_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "png").unwrap_or(false))
        .collect();
    pages.sort();

    if pages.is_empty() {
        return Err(ExtractionError::Ocr("pdftoppm produced no images".to_string()));
    }
    Ok(pages)
}

fn read_page(image: &Path, lang: &str, page_num: usize) -> Result<String, ExtractionError> {
    let output = Command::new("tesseract")
        .arg(image)
        .arg("stdout")
        .arg("-l")
        .arg(lang)
        .output()
        .map_err(|e| {
            ExtractionError::Ocr(format!("failed to run tesseract on page {page_num}: {e}"))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("tesseract warning on page {page_num}: {}", stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OcrConfig::default();
        assert_eq!(config.dpi, 300);
        assert_eq!(config.lang, "eng");
    }

    #[test]
    fn test_recognize_rejects_non_pdf() {
        // Fails either on tool availability or on pdftoppm parsing the input.
        assert!(recognize(b"not a pdf", &OcrConfig::default()).is_err());
    }
}
