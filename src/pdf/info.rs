//! Summary of a single PDF for diagnosing failed rows

use std::path::Path;
use lopdf::{Document, Object};
use crate::error::{Error, Result};

/// What a document looks like to the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Pages whose extracted text is not blank
    ///
    /// Zero here usually means a scanned document without a text layer, in
    /// which case no form code can ever be found.
    pub text_pages: usize,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

/// Read page count, text coverage, and Info dictionary strings
pub fn describe(path: &Path) -> Result<DocumentInfo> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let pages = doc.get_pages();

    let mut text_pages = 0;
    for &page_number in pages.keys() {
        let text = doc.extract_text(&[page_number])?;
        if !text.trim().is_empty() {
            text_pages += 1;
        }
    }

    Ok(DocumentInfo {
        page_count: pages.len(),
        text_pages,
        title: info_string(&doc, b"Title"),
        author: info_string(&doc, b"Author"),
    })
}

/// Look up a UTF-8 string entry in the trailer's Info dictionary
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info_id = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => *id,
        _ => return None,
    };
    let info = doc.get_dictionary(info_id).ok()?;
    let bytes = info.get(key).ok()?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}
