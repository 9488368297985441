//! Batch run over a spreadsheet range
//!
//! One run loads the workbook, indexes the document tree, walks the
//! configured row range once and writes the whole workbook back. Problems
//! with a single row never stop the run. A missing column, a bad row range,
//! a missing document tree, or a failed save abort it, and in those cases
//! the workbook on disk is left untouched.

use tracing::{error, info, warn};
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::index::FileIndex;
use crate::pdf::{passed, PdfValidator, Validator};
use crate::table::{ColumnLayout, Table};
use crate::viewer::Launcher;

/// Value written to the result column for a passing row
pub const PASS: &str = "pass";
/// Value written to the result column for a failing row
pub const FAIL: &str = "fail";

/// What happened to one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// Blank file name or not in the index; result cell untouched
    Skipped,
    /// Declared language differs from the expected one; marked fail
    LanguageMismatch,
    /// Both form codes found
    Passed,
    /// Document checked and at least one code missing
    Failed,
    /// Document unreadable or unparsable; marked fail
    Error,
}

/// Totals for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub language_mismatches: usize,
    pub errors: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, status: RowStatus) {
        match status {
            RowStatus::Skipped => self.skipped += 1,
            RowStatus::LanguageMismatch => self.language_mismatches += 1,
            RowStatus::Passed => self.passed += 1,
            RowStatus::Failed => self.failed += 1,
            RowStatus::Error => self.errors += 1,
        }
    }

    /// Rows whose result cell was written
    pub fn processed(&self) -> usize {
        self.passed + self.failed + self.language_mismatches + self.errors
    }
}

/// Runs one batch with a given validator and viewer
pub struct BatchRunner<'a> {
    config: &'a RunConfig,
    validator: &'a dyn Validator,
    launcher: &'a dyn Launcher,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: &'a RunConfig, validator: &'a dyn Validator, launcher: &'a dyn Launcher) -> Self {
        Self {
            config,
            validator,
            launcher,
        }
    }

    /// Process the configured row range and save the workbook
    pub fn run(&self) -> Result<RunSummary> {
        let config = self.config;
        config.validate()?;

        let mut table = Table::load(&config.table)?;
        let layout = table.require_columns(&config.columns)?;

        if config.end_row > table.len() {
            return Err(Error::RowRangeOutOfBounds {
                end: config.end_row,
                rows: table.len(),
            });
        }

        let index = FileIndex::build(&config.corpus_root)?;

        info!(
            "Checking {} rows ({}..{}) of {}",
            config.row_count(),
            config.start_row,
            config.end_row,
            config.table.display()
        );

        let mut summary = RunSummary::default();
        for row in config.start_row..config.end_row {
            let status = self.process_row(&mut table, &layout, &index, row);
            summary.record(status);
        }

        table.save(&config.table)?;
        info!(
            "Spreadsheet updated successfully with pass/fail results: {}",
            config.table.display()
        );
        info!(
            "Passed: {}, failed: {}, language mismatches: {}, errors: {}, skipped: {}",
            summary.passed,
            summary.failed,
            summary.language_mismatches,
            summary.errors,
            summary.skipped
        );

        Ok(summary)
    }

    fn process_row(
        &self,
        table: &mut Table,
        layout: &ColumnLayout,
        index: &FileIndex,
        row: usize,
    ) -> RowStatus {
        // Spreadsheet row number as the operator sees it (after the header)
        let sheet_row = row + 2;

        let document = table.text(row, layout.document);
        let cma_code = table.text(row, layout.cma_code);
        let factsheet_code = table.text(row, layout.factsheet_code);
        let language = table.text(row, layout.language);

        let path = match index.get(&document) {
            Some(path) if !document.is_empty() => path,
            _ => {
                warn!("Skipping row {} - PDF '{}' not found or empty", sheet_row, document);
                return RowStatus::Skipped;
            }
        };

        if language != self.config.expected_language {
            table.set_text(row, layout.result, FAIL);
            warn!(
                "Row {} failed language validation. Expected: {}, Found: {}",
                sheet_row, self.config.expected_language, language
            );
            return RowStatus::LanguageMismatch;
        }

        info!("Validating PDF for row {}: {}", sheet_row, path.display());
        let outcome = self
            .validator
            .validate(path, &document, &cma_code, &factsheet_code);

        let status = match &outcome {
            Ok(findings) if findings.is_pass() => RowStatus::Passed,
            Ok(findings) => {
                info!(
                    "Row {}: CMA code found: {}, factsheet code found: {} ({} pages)",
                    sheet_row, findings.cma_found, findings.factsheet_found, findings.page_count
                );
                RowStatus::Failed
            }
            Err(e) => {
                error!("Row {}: {}", sheet_row, e);
                RowStatus::Error
            }
        };
        table.set_text(row, layout.result, if passed(&outcome) { PASS } else { FAIL });

        if self.config.open_documents {
            if let Err(e) = self.launcher.launch(path) {
                warn!("{}", e);
            }
        }

        status
    }
}

/// Run a batch with the PDF validator, logging instead of returning errors
///
/// Returns `None` when the run was aborted; the workbook is only rewritten
/// if the run got as far as saving.
pub fn execute(config: &RunConfig, launcher: &dyn Launcher) -> Option<RunSummary> {
    match BatchRunner::new(config, &PdfValidator, launcher).run() {
        Ok(summary) => Some(summary),
        Err(e) => {
            error!("An error occurred: {}", e);
            None
        }
    }
}
