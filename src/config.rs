//! Run configuration
//!
//! A run is fully described by a [`RunConfig`]: which workbook to update,
//! which columns hold the document name, form codes, language and result,
//! where the documents live, and which rows to process. Configurations can be
//! written as TOML:
//!
//! ```toml
//! table = "Compare_Sheet.xlsx"
//! corpus_root = "Requirements/oil"
//! expected_language = "EN"
//! start_row = 0
//! end_row = 4
//!
//! [columns]
//! result = "Result"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::error::{Error, Result};

/// Names of the spreadsheet columns a run reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Column holding the PDF file name
    pub document: String,
    /// Column holding the CMA form code
    pub cma_code: String,
    /// Column holding the factsheet form code
    pub factsheet_code: String,
    /// Column receiving "pass" or "fail"
    pub result: String,
    /// Column holding the declared language code
    pub language: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            document: "CombinedFormCode_Pdf_version".to_string(),
            cma_code: "CMAFormCode".to_string(),
            factsheet_code: "FactsheetFormCode".to_string(),
            result: "Result".to_string(),
            language: "LANG".to_string(),
        }
    }
}

impl ColumnNames {
    /// All five names, in the order they are checked against the header row
    pub fn required(&self) -> [&str; 5] {
        [
            self.document.as_str(),
            self.cma_code.as_str(),
            self.factsheet_code.as_str(),
            self.result.as_str(),
            self.language.as_str(),
        ]
    }
}

/// Parameters for one batch run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Workbook to read and rewrite
    pub table: PathBuf,
    /// Directory tree searched for documents
    pub corpus_root: PathBuf,
    /// Column names
    #[serde(default)]
    pub columns: ColumnNames,
    /// Language code a row must declare to be validated
    #[serde(default = "default_language")]
    pub expected_language: String,
    /// First data row to process (zero-based, inclusive)
    #[serde(default)]
    pub start_row: usize,
    /// Data row to stop at (zero-based, exclusive)
    pub end_row: usize,
    /// Open each validated document in the default viewer
    #[serde(default = "default_open_documents")]
    pub open_documents: bool,
}

fn default_language() -> String {
    "EN".to_string()
}

fn default_open_documents() -> bool {
    true
}

impl RunConfig {
    /// Create a configuration with default column names and language
    pub fn new(
        table: impl Into<PathBuf>,
        corpus_root: impl Into<PathBuf>,
        start_row: usize,
        end_row: usize,
    ) -> Self {
        Self {
            table: table.into(),
            corpus_root: corpus_root.into(),
            columns: ColumnNames::default(),
            expected_language: default_language(),
            start_row,
            end_row,
            open_documents: default_open_documents(),
        }
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RunConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    ///
    /// Relative `table` and `corpus_root` paths are resolved against the
    /// directory containing the configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;

        if let Some(base) = path.parent() {
            if config.table.is_relative() {
                config.table = base.join(&config.table);
            }
            if config.corpus_root.is_relative() {
                config.corpus_root = base.join(&config.corpus_root);
            }
        }

        Ok(config)
    }

    /// Check values that would otherwise make every row fail or be skipped
    pub fn validate(&self) -> Result<()> {
        if self.expected_language.trim().is_empty() {
            return Err(Error::Config("expected_language must not be blank".to_string()));
        }

        for name in self.columns.required() {
            if name.trim().is_empty() {
                return Err(Error::Config("column names must not be blank".to_string()));
            }
        }

        Ok(())
    }

    /// Number of rows the configured range covers
    pub fn row_count(&self) -> usize {
        self.end_row.saturating_sub(self.start_row)
    }
}
