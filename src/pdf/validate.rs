//! Form-code validation of a single PDF
//!
//! A document passes when both the CMA form code and the factsheet form code
//! occur somewhere in its extracted text. Each code only has to appear on one
//! page; the two codes may sit on different pages and page order is
//! irrelevant.

use std::fs::File;
use std::path::Path;
use lopdf::Document;
use thiserror::Error;
use tracing::{debug, info};

/// What was found in a readable document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Findings {
    /// Total number of pages
    pub page_count: usize,
    /// CMA form code appeared on at least one page
    pub cma_found: bool,
    /// Factsheet form code appeared on at least one page
    pub factsheet_found: bool,
}

impl Findings {
    /// Both form codes were found
    pub fn is_pass(&self) -> bool {
        self.cma_found && self.factsheet_found
    }
}

/// Why a document could not be checked
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// File missing or not readable
    #[error("PDF '{name}' not readable: {message}")]
    Unreadable { name: String, message: String },

    /// File opened but could not be parsed or its text extracted
    #[error("PDF '{name}' could not be processed: {message}")]
    Extraction { name: String, message: String },
}

/// Result of validating one document
pub type Outcome = std::result::Result<Findings, ValidationError>;

/// Pass/fail decision for an outcome; errors always fail
pub fn passed(outcome: &Outcome) -> bool {
    matches!(outcome, Ok(findings) if findings.is_pass())
}

/// Document checker used by the batch runner
pub trait Validator {
    fn validate(
        &self,
        path: &Path,
        display_name: &str,
        cma_code: &str,
        factsheet_code: &str,
    ) -> Outcome;
}

/// Validator backed by lopdf text extraction
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfValidator;

impl Validator for PdfValidator {
    fn validate(
        &self,
        path: &Path,
        display_name: &str,
        cma_code: &str,
        factsheet_code: &str,
    ) -> Outcome {
        validate_pdf(path, display_name, cma_code, factsheet_code)
    }
}

/// Accumulates marker presence across pages
///
/// Flags only ever go from false to true. A blank marker never matches.
#[derive(Debug)]
pub struct MarkerScan<'a> {
    cma_code: &'a str,
    factsheet_code: &'a str,
    cma_found: bool,
    factsheet_found: bool,
}

impl<'a> MarkerScan<'a> {
    pub fn new(cma_code: &'a str, factsheet_code: &'a str) -> Self {
        Self {
            cma_code,
            factsheet_code,
            cma_found: false,
            factsheet_found: false,
        }
    }

    /// Check one page of text
    pub fn observe(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.cma_found && contains_marker(text, self.cma_code) {
            self.cma_found = true;
        }
        if !self.factsheet_found && contains_marker(text, self.factsheet_code) {
            self.factsheet_found = true;
        }
    }

    pub fn finish(self, page_count: usize) -> Findings {
        Findings {
            page_count,
            cma_found: self.cma_found,
            factsheet_found: self.factsheet_found,
        }
    }
}

fn contains_marker(text: &str, marker: &str) -> bool {
    !marker.is_empty() && text.contains(marker)
}

/// Validate one PDF against its two form codes
///
/// Never panics or returns early with a crate error: unreadable files and
/// parse failures come back as [`ValidationError`] values.
pub fn validate_pdf(path: &Path, display_name: &str, cma_code: &str, factsheet_code: &str) -> Outcome {
    if let Err(e) = File::open(path) {
        return Err(ValidationError::Unreadable {
            name: display_name.to_string(),
            message: e.to_string(),
        });
    }
    info!("PDF {} is readable", display_name);

    let extraction_error = |e: lopdf::Error| ValidationError::Extraction {
        name: display_name.to_string(),
        message: e.to_string(),
    };

    let doc = Document::load(path).map_err(extraction_error)?;
    let pages = doc.get_pages();
    let mut scan = MarkerScan::new(cma_code, factsheet_code);

    for &page_number in pages.keys() {
        let text = doc.extract_text(&[page_number]).map_err(extraction_error)?;
        debug!("{} page {}: {} chars of text", display_name, page_number, text.len());
        scan.observe(&text);
    }

    Ok(scan.finish(pages.len()))
}
