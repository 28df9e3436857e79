//! PDF text extraction
//!
//! `pdf-extract` is tried first for whole-document text; when it yields too
//! little, `lopdf` is used page by page. Extraction never fails loudly: an
//! empty string means nothing usable came out of the file.

mod metadata;
mod source;

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

pub use metadata::{PdfMetadata, extract_metadata};
pub use source::{ExtractError, LopdfSource, PdfExtractSource, TextSource};

/// Trimmed primary output shorter than this triggers the fallback source
pub const MIN_PRIMARY_CHARS: usize = 100;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Collapse every whitespace run to a single space and trim the ends
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Two-stage text extractor
pub struct TextExtractor {
    primary: Box<dyn TextSource>,
    fallback: Box<dyn TextSource>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor {
    /// Extractor with `pdf-extract` as primary and `lopdf` as fallback
    pub fn new() -> Self {
        Self::with_sources(Box::new(PdfExtractSource), Box::new(LopdfSource))
    }

    pub fn with_sources(primary: Box<dyn TextSource>, fallback: Box<dyn TextSource>) -> Self {
        debug!(primary = primary.name(), fallback = fallback.name(), "TextExtractor::with_sources: called");
        Self { primary, fallback }
    }

    /// Extract cleaned plain text from `path`, or `""` when nothing usable came out
    pub fn extract_text(&self, path: &Path) -> String {
        debug!(?path, "extract_text: called");

        let primary = match self.primary.extract(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(source = self.primary.name(), error = %e, "Primary extraction failed");
                String::new()
            }
        };

        let primary_len = primary.trim().chars().count();
        let raw = if primary_len < MIN_PRIMARY_CHARS {
            debug!(primary_len, "extract_text: primary output too short, trying fallback");
            match self.fallback.extract(path) {
                Ok(text) if text.trim().chars().count() > primary_len => {
                    debug!("extract_text: using fallback output");
                    text
                }
                Ok(_) => {
                    debug!("extract_text: fallback produced no more text, keeping primary");
                    primary
                }
                Err(e) => {
                    warn!(source = self.fallback.name(), error = %e, "Fallback extraction failed");
                    primary
                }
            }
        } else {
            primary
        };

        let cleaned = clean_text(&raw);
        if cleaned.is_empty() {
            warn!("No text could be extracted from {}", path.display());
        } else {
            info!("Extracted {} characters from {}", cleaned.chars().count(), path.display());
        }
        cleaned
    }
}
