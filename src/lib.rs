//! PDF Form-Code Checker Library
//!
//! Verifies that PDF documents listed in a spreadsheet carry the form codes
//! recorded next to them, and writes "pass" or "fail" back into the sheet.
//! This library provides functionality to:
//! - Index a directory tree of documents by file name
//! - Load and rewrite the first worksheet of an `.xlsx` workbook
//! - Search each page's text for the CMA and factsheet form codes
//! - Run the whole check over a row range and summarize the results
//!
//! # Example
//!
//! ```no_run
//! use pdf_formcheck::batch::execute;
//! use pdf_formcheck::config::RunConfig;
//! use pdf_formcheck::viewer::NoopLauncher;
//!
//! let config = RunConfig::new("Compare_Sheet.xlsx", "Requirements/oil", 0, 4);
//!
//! if let Some(summary) = execute(&config, &NoopLauncher) {
//!     println!("{} rows passed", summary.passed);
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod index;
pub mod pdf;
pub mod table;
pub mod viewer;

// Re-export commonly used items
pub use error::{Error, Result};
