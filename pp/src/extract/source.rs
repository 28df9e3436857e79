//! Text extraction backends

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use lopdf::Document;
use thiserror::Error;
use tracing::debug;

/// Errors from a single extraction backend
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to load PDF: {0}")]
    Load(String),

    #[error("Cannot decrypt password-protected PDF")]
    Encrypted,

    #[error("Extraction backend error: {0}")]
    Backend(String),

    #[error("Extraction backend panicked")]
    Panicked,
}

/// A way of pulling raw text out of a PDF file
pub trait TextSource: Send + Sync {
    /// Backend name, for logging
    fn name(&self) -> &'static str;

    /// Raw, uncleaned text of the whole document
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Whole-document extraction with `pdf-extract`
pub struct PdfExtractSource;

impl TextSource for PdfExtractSource {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        debug!(?path, "PdfExtractSource::extract: called");
        // The font parsers underneath can panic on malformed input
        match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractError::Backend(e.to_string())),
            Err(_) => {
                debug!("PdfExtractSource::extract: backend panicked");
                Err(ExtractError::Panicked)
            }
        }
    }
}

/// Page-by-page extraction with `lopdf`
pub struct LopdfSource;

impl LopdfSource {
    pub(crate) fn load(path: &Path) -> Result<Document, ExtractError> {
        debug!(?path, "LopdfSource::load: called");
        let mut document = Document::load(path).map_err(|e| ExtractError::Load(e.to_string()))?;

        // Empty password covers PDFs that are encrypted but not protected
        if document.is_encrypted() && document.decrypt("").is_err() {
            debug!("LopdfSource::load: decryption failed");
            return Err(ExtractError::Encrypted);
        }
        Ok(document)
    }
}

impl TextSource for LopdfSource {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        debug!(?path, "LopdfSource::extract: called");
        let mut document = Self::load(path)?;
        document.decompress();

        let mut page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();
        debug!(pages = page_numbers.len(), "LopdfSource::extract: extracting pages");

        let mut text = String::new();
        for page in page_numbers {
            match document.extract_text(&[page]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => debug!(page, error = %e, "LopdfSource::extract: skipping page"),
            }
        }
        Ok(text)
    }
}
