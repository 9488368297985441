//! Error types for the form-code checker

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the form-code checker
///
/// These are run-level failures. Problems with a single document are
/// reported as a [`crate::pdf::ValidationError`] inside its outcome instead.
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Workbook could not be read
    #[error("Spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::Error),

    /// Workbook could not be written
    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Workbook has no worksheets
    #[error("Workbook has no worksheets: {}", .0.display())]
    EmptyWorkbook(PathBuf),

    /// Required column absent from the header row
    #[error("Column '{0}' not found in the spreadsheet")]
    MissingColumn(String),

    /// Requested rows extend past the end of the table
    #[error("Row range ends at {end} but the spreadsheet has only {rows} data rows")]
    RowRangeOutOfBounds { end: usize, rows: usize },

    /// Document root missing or not a directory
    #[error("Document directory not found: {}", .0.display())]
    CorpusNotFound(PathBuf),

    /// Invalid run configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Viewer could not be started
    #[error("Failed to open {}: {message}", .path.display())]
    Launch { path: PathBuf, message: String },
}
