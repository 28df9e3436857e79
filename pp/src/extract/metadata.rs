//! PDF document metadata

use std::path::Path;

use lopdf::{Dictionary, Document, Object};
use serde::Serialize;
use tracing::{debug, warn};

use super::source::LopdfSource;

/// Document information dictionary plus page count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub pages: usize,
}

/// Read the metadata of `path`; empty metadata when the file can't be read
pub fn extract_metadata(path: &Path) -> PdfMetadata {
    debug!(?path, "extract_metadata: called");
    let document = match LopdfSource::load(path) {
        Ok(document) => document,
        Err(e) => {
            warn!("Failed to read metadata from {}: {}", path.display(), e);
            return PdfMetadata::default();
        }
    };

    let pages = document.get_pages().len();
    let Some(info) = info_dictionary(&document) else {
        debug!("extract_metadata: no Info dictionary");
        return PdfMetadata {
            pages,
            ..PdfMetadata::default()
        };
    };

    PdfMetadata {
        title: text_entry(info, b"Title"),
        author: text_entry(info, b"Author"),
        subject: text_entry(info, b"Subject"),
        creator: text_entry(info, b"Creator"),
        producer: text_entry(info, b"Producer"),
        creation_date: text_entry(info, b"CreationDate"),
        modification_date: text_entry(info, b"ModDate"),
        pages,
    }
}

fn info_dictionary(document: &Document) -> Option<&Dictionary> {
    match document.trailer.get(b"Info").ok()? {
        Object::Reference(id) => document.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn text_entry(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)).filter(|s| !s.is_empty()),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

// PDF text strings are UTF-16BE with a BOM, or a Latin-1 superset otherwise
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn write_pdf(path: &Path, with_info: bool) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if with_info {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal("Attention Is All You Need"),
                "Author" => Object::string_literal("Vaswani et al."),
                "Producer" => Object::string_literal("pdfTeX"),
            });
            doc.trailer.set("Info", info_id);
        }

        doc.save(path).unwrap();
    }

    #[test]
    fn test_metadata_from_info_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        write_pdf(&path, true);

        let meta = extract_metadata(&path);
        assert_eq!(meta.title.as_deref(), Some("Attention Is All You Need"));
        assert_eq!(meta.author.as_deref(), Some("Vaswani et al."));
        assert_eq!(meta.producer.as_deref(), Some("pdfTeX"));
        assert!(meta.subject.is_none());
        assert_eq!(meta.pages, 1);
    }

    #[test]
    fn test_metadata_without_info_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.pdf");
        write_pdf(&path, false);

        let meta = extract_metadata(&path);
        assert!(meta.title.is_none());
        assert_eq!(meta.pages, 1);
    }

    #[test]
    fn test_metadata_missing_file_is_empty() {
        assert_eq!(extract_metadata(Path::new("/definitely/not/here.pdf")), PdfMetadata::default());
    }

    #[test]
    fn test_decode_utf16_text_string() {
        let bytes = [0xFE, 0xFF, 0x00, 0x42, 0x00, 0x45, 0x00, 0x52, 0x00, 0x54];
        assert_eq!(decode_text_string(&bytes), "BERT");
        assert_eq!(decode_text_string(b"plain"), "plain");
    }
}
