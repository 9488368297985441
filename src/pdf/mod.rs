//! PDF inspection module

pub mod info;
pub mod validate;

// Re-export commonly used items
pub use info::{describe, DocumentInfo};
pub use validate::{
    passed, validate_pdf, Findings, MarkerScan, Outcome, PdfValidator, ValidationError, Validator,
};
