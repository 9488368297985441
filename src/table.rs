//! In-memory spreadsheet table
//!
//! The first worksheet of a workbook is loaded into a [`Table`]: the first
//! row becomes the (whitespace-trimmed) header, every following row a data
//! row. Saving rewrites the whole table as a single worksheet, at the same
//! position it was read from and with date cells still formatted as dates.

use std::path::Path;
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};
use crate::config::ColumnNames;
use crate::error::{Error, Result};

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel date/time serial number
    DateTime(f64),
    /// Excel duration, in days
    Duration(f64),
}

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const DURATION_FORMAT: &str = "[h]:mm:ss";

impl CellValue {
    /// Render the value as text
    ///
    /// Whole numbers lose their fractional part so a form code stored as a
    /// number reads back as typed (`1001`, not `1001.0`).
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) | CellValue::DateTime(n) | CellValue::Duration(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) if dt.is_duration() => CellValue::Duration(dt.as_f64()),
            Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Text(e.to_string()),
        }
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// Column positions of the five columns a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub document: usize,
    pub cma_code: usize,
    pub factsheet_code: usize,
    pub result: usize,
    pub language: usize,
}

/// Header row plus data rows of one worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    sheet_name: String,
    /// Zero-based (row, column) of the header row's first cell
    origin: (u32, u16),
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table in memory; rows are padded to the header width
    pub fn new(sheet_name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, CellValue::Empty);
                }
                row
            })
            .collect();

        Self {
            sheet_name: sheet_name.into(),
            origin: (0, 0),
            headers,
            rows,
        }
    }

    /// Load the first worksheet of a workbook
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let mut workbook = open_workbook_auto(path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Error::EmptyWorkbook(path.to_path_buf()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::EmptyWorkbook(path.to_path_buf()))??;

        let origin = range
            .start()
            .map(|(row, col)| (row, col as u16))
            .unwrap_or((0, 0));

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| CellValue::from(cell).to_text())
                .collect(),
            None => Vec::new(),
        };
        let rows = rows
            .map(|row| row.iter().map(CellValue::from).collect())
            .collect();

        let mut table = Self::new(sheet_name, headers, rows);
        table.origin = origin;
        Ok(table)
    }

    /// Write the whole table to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet_name.as_str())?;

        let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);
        let duration_format = Format::new().set_num_format(DURATION_FORMAT);
        let (first_row, first_col) = self.origin;

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string(first_row, first_col + col as u16, header.as_str())?;
        }

        for (row_idx, row) in self.rows.iter().enumerate() {
            let row_num = first_row + (row_idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = first_col + col as u16;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Text(s) => {
                        worksheet.write_string(row_num, col, s.as_str())?;
                    }
                    CellValue::Number(n) => {
                        worksheet.write_number(row_num, col, *n)?;
                    }
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(row_num, col, *b)?;
                    }
                    CellValue::DateTime(serial) => {
                        worksheet.write_number_with_format(row_num, col, *serial, &datetime_format)?;
                    }
                    CellValue::Duration(days) => {
                        worksheet.write_number_with_format(row_num, col, *days, &duration_format)?;
                    }
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (the header row is not counted)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact (trimmed) header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve all five configured columns, failing on the first absent one
    pub fn require_columns(&self, columns: &ColumnNames) -> Result<ColumnLayout> {
        let find = |name: &str| {
            self.column_index(name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        Ok(ColumnLayout {
            document: find(columns.document.as_str())?,
            cma_code: find(columns.cma_code.as_str())?,
            factsheet_code: find(columns.factsheet_code.as_str())?,
            result: find(columns.result.as_str())?,
            language: find(columns.language.as_str())?,
        })
    }

    /// Cell at a data row and column, `Empty` when out of bounds
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Trimmed text of a cell
    pub fn text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).to_text().trim().to_string()
    }

    /// Overwrite a cell with text; out-of-bounds writes are ignored
    pub fn set_text(&mut self, row: usize, col: usize, value: &str) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = CellValue::Text(value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Table {
        Table::new(
            "Sheet1",
            vec![
                " CombinedFormCode_Pdf_version ".to_string(),
                "CMAFormCode".to_string(),
                "FactsheetFormCode".to_string(),
                "Result".to_string(),
                "LANG".to_string(),
            ],
            vec![
                vec![
                    CellValue::Text("a.pdf".to_string()),
                    CellValue::Number(1001.0),
                    CellValue::Text(" FS-1 ".to_string()),
                ],
                vec![CellValue::Text("b.pdf".to_string())],
            ],
        )
    }

    #[test]
    fn test_headers_are_trimmed() {
        let table = sample();
        assert_eq!(table.headers()[0], "CombinedFormCode_Pdf_version");
        assert_eq!(table.column_index("CombinedFormCode_Pdf_version"), Some(0));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = sample();
        assert_eq!(table.cell(1, 4), &CellValue::Empty);
        assert_eq!(table.text(1, 3), "");
    }

    #[test]
    fn test_text_rendering() {
        let table = sample();
        assert_eq!(table.text(0, 1), "1001");
        assert_eq!(table.text(0, 2), "FS-1");
        assert_eq!(CellValue::Number(2.5).to_text(), "2.5");
        assert_eq!(CellValue::Bool(true).to_text(), "True");
    }

    #[test]
    fn test_require_columns_reports_first_missing() {
        let mut columns = ColumnNames::default();
        let layout = sample().require_columns(&columns).unwrap();
        assert_eq!(layout.result, 3);

        columns.language = "Language".to_string();
        match sample().require_columns(&columns) {
            Err(Error::MissingColumn(name)) => assert_eq!(name, "Language"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_set_text_out_of_bounds_is_ignored() {
        let mut table = sample();
        table.set_text(5, 0, "pass");
        table.set_text(0, 3, "pass");
        assert_eq!(table.text(0, 3), "pass");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_save_then_load_preserves_every_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sheet.xlsx");

        let mut table = sample();
        table.set_text(1, 3, "fail");
        table.save(&path).unwrap();

        let loaded = Table::load(&path).unwrap();
        assert_eq!(loaded.sheet_name(), "Sheet1");
        assert_eq!(loaded.headers(), table.headers());
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.text(0, 0), "a.pdf");
        assert_eq!(loaded.text(0, 1), "1001");
        assert_eq!(loaded.text(1, 3), "fail");
    }

    fn reload_range(path: &Path) -> calamine::Range<Data> {
        let mut workbook = open_workbook_auto(path).unwrap();
        workbook.worksheet_range_at(0).unwrap().unwrap()
    }

    #[test]
    fn test_date_cells_stay_dates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dates.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date = Format::new().set_num_format("yyyy-mm-dd");
        for (col, header) in ["CombinedFormCode_Pdf_version", "Result", "Due"].iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        worksheet.write_string(1, 0, "a.pdf").unwrap();
        worksheet.write_number_with_format(1, 2, 45672.0, &date).unwrap();
        workbook.save(&path).unwrap();

        let mut table = Table::load(&path).unwrap();
        assert_eq!(table.cell(0, 2), &CellValue::DateTime(45672.0));
        table.set_text(0, 1, "pass");
        table.save(&path).unwrap();

        let range = reload_range(&path);
        match range.get_value((1, 2)) {
            Some(Data::DateTime(dt)) => assert_eq!(dt.as_f64(), 45672.0),
            other => panic!("expected a date cell, got {:?}", other),
        }
    }

    #[test]
    fn test_save_keeps_sheet_position() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("offset.xlsx");

        // Header row starts at B2: empty first row and empty column A
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(1, 1, "CombinedFormCode_Pdf_version").unwrap();
        worksheet.write_string(1, 2, "Result").unwrap();
        worksheet.write_string(2, 1, "a.pdf").unwrap();
        workbook.save(&path).unwrap();

        let mut table = Table::load(&path).unwrap();
        assert_eq!(table.text(0, 0), "a.pdf");
        table.set_text(0, 1, "fail");
        table.save(&path).unwrap();

        let range = reload_range(&path);
        assert_eq!(range.start(), Some((1, 1)));

        let reloaded = Table::load(&path).unwrap();
        assert_eq!(reloaded.headers(), table.headers());
        assert_eq!(reloaded.text(0, 1), "fail");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Table::load(Path::new("nonexistent.xlsx"));
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }
}
